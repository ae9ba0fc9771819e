//! GraphQL client for the remote demo API.
//!
//! Each collection is fetched with one fixed query. Relations come back as
//! nested `{ id }` objects and are flattened in [`crate::transform`].

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::SeedError;

/// A collection fetched from the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    /// `users`
    Users,
    /// `companies`
    Companies,
    /// `contacts`
    Contacts,
    /// `dealStages`
    DealStages,
    /// `deals`
    Deals,
    /// `taskStages`
    TaskStages,
    /// `tasks`
    Tasks,
}

impl Collection {
    /// Root field name in the query and the response.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Companies => "companies",
            Self::Contacts => "contacts",
            Self::DealStages => "dealStages",
            Self::Deals => "deals",
            Self::TaskStages => "taskStages",
            Self::Tasks => "tasks",
        }
    }

    /// The query document for this collection.
    pub const fn query(self) -> &'static str {
        match self {
            Self::Users => {
                "query { users(filter: {}, sorting: [], paging: {limit: 100}) { nodes {
                    id name email avatarUrl jobTitle phone timezone role createdAt updatedAt
                } } }"
            }
            Self::Companies => {
                "query { companies(filter: {}, sorting: [], paging: {limit: 100}) { nodes {
                    id name avatarUrl businessType companySize industry totalRevenue
                    salesOwner { id } createdAt updatedAt
                } } }"
            }
            Self::Contacts => {
                "query { contacts(filter: {}, sorting: [], paging: {limit: 100}) { nodes {
                    id name email avatarUrl jobTitle phone stage status
                    company { id } salesOwner { id } createdAt updatedAt
                } } }"
            }
            Self::DealStages => {
                "query { dealStages(filter: {}, sorting: [], paging: {limit: 50}) { nodes {
                    id title createdAt updatedAt
                } } }"
            }
            Self::Deals => {
                "query { deals(filter: {}, sorting: [], paging: {limit: 100}) { nodes {
                    id title value stage { id } company { id } contact { id }
                    salesOwner { id } createdAt updatedAt
                } } }"
            }
            Self::TaskStages => {
                "query { taskStages(filter: {}, sorting: [], paging: {limit: 50}) { nodes {
                    id title createdAt updatedAt
                } } }"
            }
            Self::Tasks => {
                "query { tasks(filter: {}, sorting: [], paging: {limit: 100}) { nodes {
                    id title description dueDate completed stage { id } assignedTo { id }
                    createdAt updatedAt
                } } }"
            }
        }
    }
}

const LOGIN_MUTATION: &str = "mutation Login($email: String!) {
    login(loginInput: { email: $email }) { accessToken user { id name email } }
}";

/// HTTP client bound to one remote endpoint.
pub struct RemoteClient {
    client: reqwest::Client,
    api_url: String,
    access_token: Option<String>,
}

impl RemoteClient {
    /// Create an unauthenticated client.
    pub fn new(api_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.to_owned(),
            access_token: None,
        }
    }

    /// Sign in and keep the access token for later requests.
    pub async fn authenticate(&mut self, email: &str) -> Result<(), SeedError> {
        let data = self
            .execute(LOGIN_MUTATION, serde_json::json!({ "email": email }))
            .await?;
        let token = extract_str(&data, &["login", "accessToken"])
            .ok_or_else(|| SeedError::MissingData(String::from("login.accessToken")))?;
        self.access_token = Some(token.to_owned());
        Ok(())
    }

    /// Fetch every node of `collection`.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> Result<Vec<T>, SeedError> {
        let data = self
            .execute(collection.query(), Value::Object(serde_json::Map::new()))
            .await?;
        decode_nodes(data, collection.key())
    }

    /// POST one GraphQL operation and return its `data`.
    async fn execute(&self, query: &str, variables: Value) -> Result<Value, SeedError> {
        let body = serde_json::json!({ "query": query, "variables": variables });

        let mut request = self
            .client
            .post(&self.api_url)
            .header("Content-Type", "application/json")
            .json(&body);
        if let Some(token) = &self.access_token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| SeedError::Http(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(SeedError::Http(format!("remote returned {status}: {error_body}")));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| SeedError::Http(format!("response parse failed: {e}")))?;

        into_data(json)
    }
}

/// Split a GraphQL response into its `data`, or the joined error messages.
fn into_data(mut json: Value) -> Result<Value, SeedError> {
    if let Some(errors) = json.get("errors").and_then(Value::as_array) {
        let messages: Vec<&str> = errors
            .iter()
            .filter_map(|e| e.get("message").and_then(Value::as_str))
            .collect();
        return Err(SeedError::GraphQl(messages.join("; ")));
    }
    match json.get_mut("data").map(Value::take) {
        Some(data) if !data.is_null() => Ok(data),
        _ => Err(SeedError::MissingData(String::from("data"))),
    }
}

/// Deserialize `data.<key>.nodes`.
fn decode_nodes<T: DeserializeOwned>(mut data: Value, key: &str) -> Result<Vec<T>, SeedError> {
    let nodes = data
        .get_mut(key)
        .and_then(|c| c.get_mut("nodes"))
        .map(Value::take)
        .ok_or_else(|| SeedError::MissingData(format!("{key}.nodes")))?;
    Ok(serde_json::from_value(nodes)?)
}

fn extract_str<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    path.iter()
        .try_fold(value, |v, key| v.get(key))
        .and_then(Value::as_str)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::transform::RemoteStage;

    #[test]
    fn graphql_errors_are_reported() {
        let err = into_data(json!({
            "errors": [{ "message": "Unauthorized" }, { "message": "Forbidden" }],
            "data": null
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "GraphQL errors: Unauthorized; Forbidden");
    }

    #[test]
    fn null_data_is_missing() {
        assert!(matches!(
            into_data(json!({ "data": null })),
            Err(SeedError::MissingData(_))
        ));
    }

    #[test]
    fn nodes_are_decoded() {
        let data = into_data(json!({ "data": { "dealStages": { "nodes": [
            { "id": "1", "title": "WON", "createdAt": "2024-01-01T00:00:00Z",
              "updatedAt": "2024-01-01T00:00:00Z" }
        ] } } }))
        .unwrap();
        let stages: Vec<RemoteStage> = decode_nodes(data, Collection::DealStages.key()).unwrap();
        assert_eq!(stages.len(), 1);
        assert_eq!(stages.first().unwrap().title, "WON");
    }

    #[test]
    fn login_token_is_extracted() {
        let data = json!({ "login": { "accessToken": "abc" } });
        assert_eq!(extract_str(&data, &["login", "accessToken"]), Some("abc"));
        assert_eq!(extract_str(&data, &["login", "user"]), None);
    }

    #[test]
    fn every_query_selects_its_own_root_field() {
        for collection in [
            Collection::Users,
            Collection::Companies,
            Collection::Contacts,
            Collection::DealStages,
            Collection::Deals,
            Collection::TaskStages,
            Collection::Tasks,
        ] {
            let expected = format!("{}(filter", collection.key());
            assert!(collection.query().contains(&expected));
        }
    }
}
