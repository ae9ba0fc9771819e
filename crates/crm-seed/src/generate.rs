//! Generated demo records.
//!
//! Used whenever a remote collection is unavailable. Every generator takes
//! the collections it references so that generated records point at ids
//! that exist, falling back to the ids the other generators would produce.

use chrono::{DateTime, Days, Duration, Utc};
use crm_types::{
    Company, CompanyId, CompanySize, Contact, ContactId, ContactStage, ContactStatus, Deal,
    DealId, DealStage, DealStageId, Event, EventId, Task, TaskId, TaskStage, TaskStageId, User,
    UserId, UserRole,
};
use rand::Rng;

/// Upper bound on generated calendar events.
pub const MAX_EVENTS: usize = 20;

const EVENT_TITLES: [&str; 10] = [
    "Demo Call",
    "Product Presentation",
    "Contract Review",
    "Sales Meeting",
    "Proposal Discussion",
    "Follow-up Call",
    "Quarterly Review",
    "Strategy Session",
    "Client Check-in",
    "Progress Update",
];

const EVENT_COLORS: [&str; 8] = [
    "#1890ff", "#52c41a", "#722ed1", "#eb2f96", "#fa8c16", "#13c2c2", "#f5222d", "#a0d911",
];

/// Id of the `n`th record in `records`, or `fallback`.
fn nth_id<R, I>(records: &[R], n: usize, id: impl Fn(&R) -> &I, fallback: &'static str) -> I
where
    I: Clone + From<&'static str>,
{
    records.get(n).map_or_else(|| I::from(fallback), |r| id(r).clone())
}

/// Two sales users: an admin and a sales person.
pub fn mock_users(now: DateTime<Utc>) -> Vec<User> {
    vec![
        User {
            id: UserId::from("1"),
            name: String::from("John Doe"),
            email: String::from("john@refine.dev"),
            avatar_url: Some(String::from("https://i.pravatar.cc/128?img=1")),
            job_title: Some(String::from("Sales Manager")),
            phone: Some(String::from("+1 (555) 123-4567")),
            timezone: Some(String::from("America/New_York")),
            role: UserRole::Admin,
            created_at: now,
            updated_at: now,
        },
        User {
            id: UserId::from("2"),
            name: String::from("Jane Smith"),
            email: String::from("jane@refine.dev"),
            avatar_url: Some(String::from("https://i.pravatar.cc/128?img=2")),
            job_title: Some(String::from("Account Executive")),
            phone: Some(String::from("+1 (555) 987-6543")),
            timezone: Some(String::from("America/Los_Angeles")),
            role: UserRole::SalesPerson,
            created_at: now,
            updated_at: now,
        },
    ]
}

/// Two companies owned by the first two users.
pub fn mock_companies(users: &[User], now: DateTime<Utc>) -> Vec<Company> {
    let owner = |n| Some(nth_id(users, n, |u: &User| &u.id, if n == 0 { "1" } else { "2" }));
    vec![
        Company {
            id: CompanyId::from("1"),
            name: String::from("Acme Corporation"),
            avatar_url: Some(String::from(
                "https://via.placeholder.com/50x50/1890ff/ffffff?text=AC",
            )),
            business_type: Some(String::from("B2B")),
            company_size: Some(CompanySize::Enterprise),
            industry: Some(String::from("Technology")),
            total_revenue: Some(5_000_000.0),
            sales_owner_id: owner(0),
            created_at: now,
            updated_at: now,
        },
        Company {
            id: CompanyId::from("2"),
            name: String::from("TechStart Inc"),
            avatar_url: Some(String::from(
                "https://via.placeholder.com/50x50/52c41a/ffffff?text=TS",
            )),
            business_type: Some(String::from("B2B")),
            company_size: Some(CompanySize::Small),
            industry: Some(String::from("Technology")),
            total_revenue: Some(1_200_000.0),
            sales_owner_id: owner(1),
            created_at: now,
            updated_at: now,
        },
    ]
}

/// One contact per company.
pub fn mock_contacts(companies: &[Company], users: &[User], now: DateTime<Utc>) -> Vec<Contact> {
    let fallback = |n: usize| if n == 0 { "1" } else { "2" };
    let company = |n| Some(nth_id(companies, n, |c: &Company| &c.id, fallback(n)));
    let owner = |n| Some(nth_id(users, n, |u: &User| &u.id, fallback(n)));
    vec![
        Contact {
            id: ContactId::from("1"),
            name: String::from("Bob Johnson"),
            email: String::from("bob@acme.com"),
            avatar_url: Some(String::from("https://i.pravatar.cc/128?img=3")),
            job_title: Some(String::from("CTO")),
            phone: Some(String::from("+1 (555) 111-2222")),
            stage: ContactStage::SalesQualifiedLead,
            status: ContactStatus::Active,
            company_id: company(0),
            sales_owner_id: owner(0),
            created_at: now,
            updated_at: now,
        },
        Contact {
            id: ContactId::from("2"),
            name: String::from("Alice Brown"),
            email: String::from("alice@techstart.com"),
            avatar_url: Some(String::from("https://i.pravatar.cc/128?img=4")),
            job_title: Some(String::from("CEO")),
            phone: Some(String::from("+1 (555) 333-4444")),
            stage: ContactStage::Lead,
            status: ContactStatus::Active,
            company_id: company(1),
            sales_owner_id: owner(1),
            created_at: now,
            updated_at: now,
        },
    ]
}

/// The four pipeline columns.
pub fn mock_deal_stages(now: DateTime<Utc>) -> Vec<DealStage> {
    ["LEAD", "QUALIFIED", "PROPOSAL", "WON"]
        .into_iter()
        .zip(1_u32..)
        .map(|(title, id)| DealStage {
            id: DealStageId::new(id.to_string()),
            title: String::from(title),
            created_at: now,
            updated_at: now,
        })
        .collect()
}

/// Two open deals, one per company.
pub fn mock_deals(
    companies: &[Company],
    contacts: &[Contact],
    users: &[User],
    stages: &[DealStage],
    now: DateTime<Utc>,
) -> Vec<Deal> {
    let fallback = |n: usize| if n == 0 { "1" } else { "2" };
    let deal = |id: &str, title: &str, value: f64, n: usize, stage_n: usize, stage_fb: &str| Deal {
        id: DealId::from(id),
        title: String::from(title),
        value,
        stage_id: Some(
            stages
                .get(stage_n)
                .map_or_else(|| DealStageId::from(stage_fb), |s| s.id.clone()),
        ),
        company_id: Some(nth_id(companies, n, |c: &Company| &c.id, fallback(n))),
        contact_id: Some(nth_id(contacts, n, |c: &Contact| &c.id, fallback(n))),
        sales_owner_id: Some(nth_id(users, n, |u: &User| &u.id, fallback(n))),
        created_at: now,
        updated_at: now,
    };
    vec![
        deal("1", "Enterprise License for Acme Corp", 150_000.0, 0, 2, "3"),
        deal("2", "Startup Package for TechStart", 25_000.0, 1, 1, "2"),
    ]
}

/// The three board columns.
pub fn mock_task_stages(now: DateTime<Utc>) -> Vec<TaskStage> {
    ["TODO", "IN_PROGRESS", "DONE"]
        .into_iter()
        .zip(1_u32..)
        .map(|(title, id)| TaskStage {
            id: TaskStageId::new(id.to_string()),
            title: String::from(title),
            created_at: now,
            updated_at: now,
        })
        .collect()
}

/// Three tasks, one per board column. The last one is done.
pub fn mock_tasks(users: &[User], stages: &[TaskStage], now: DateTime<Utc>) -> Vec<Task> {
    let specs: [(&str, &str, u64, usize, usize); 3] = [
        (
            "Follow up with Acme Corp",
            "Schedule a demo call to discuss their requirements",
            7,
            0,
            0,
        ),
        (
            "Prepare proposal for TechStart",
            "Create a custom proposal based on their startup needs",
            3,
            1,
            1,
        ),
        (
            "Send contract to Acme Corp",
            "Review and send final contract documents",
            1,
            2,
            0,
        ),
    ];
    let fallback = ["1", "2", "3"];

    specs
        .into_iter()
        .zip(fallback)
        .map(|((title, description, due_in, stage_n, user_n), id)| {
            let done = stage_n == 2;
            Task {
                id: TaskId::from(id),
                title: String::from(title),
                description: Some(String::from(description)),
                due_date: now.checked_add_days(Days::new(due_in)),
                completed: done,
                stage_id: Some(
                    stages
                        .get(stage_n)
                        .map_or_else(|| TaskStageId::from(id), |s| s.id.clone()),
                ),
                assigned_to_id: Some(nth_id(
                    users,
                    user_n,
                    |u: &User| &u.id,
                    if user_n == 0 { "1" } else { "2" },
                )),
                created_at: if done {
                    now.checked_sub_days(Days::new(5)).unwrap_or(now)
                } else {
                    now
                },
                updated_at: now,
            }
        })
        .collect()
}

/// Calendar events for the next 30 days.
///
/// Produces `min(20, 2 * companies)` events. Event `i` is about the
/// `i`th company (cycling) and attended by the `i`th user (cycling). Each
/// starts between 09:00 and 16:59 UTC and lasts 30 to 119 minutes.
pub fn generate_events(
    companies: &[Company],
    users: &[User],
    now: DateTime<Utc>,
    rng: &mut impl Rng,
) -> Vec<Event> {
    let count = companies.len().saturating_mul(2).min(MAX_EVENTS);

    companies
        .iter()
        .cycle()
        .zip(EVENT_TITLES.iter().cycle())
        .zip(EVENT_COLORS.iter().cycle())
        .take(count)
        .zip(1_usize..)
        .filter_map(|(((company, title), color), id)| {
            let day_offset: u64 = rng.random_range(0..30);
            let hour: u32 = rng.random_range(9..17);
            let minute: u32 = rng.random_range(0..60);
            let length: i64 = rng.random_range(30..120);

            let start_date = now
                .date_naive()
                .checked_add_days(Days::new(day_offset))?
                .and_hms_opt(hour, minute, 0)?
                .and_utc();
            let end_date = start_date.checked_add_signed(Duration::minutes(length))?;

            let participant = id
                .checked_sub(1)
                .and_then(|i| i.checked_rem(users.len()))
                .and_then(|i| users.get(i));

            Some(Event {
                id: EventId::new(id.to_string()),
                title: format!("{title} with {}", company.name),
                start_date,
                end_date,
                color: String::from(*color),
                participant_ids: participant.map(|u| u.id.clone()).into_iter().collect(),
                created_at: now,
                updated_at: now,
            })
        })
        .collect()
}
