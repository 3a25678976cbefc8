use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Default, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    /// Display name taken from the identity provider
    #[schema(example = "Robin")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize() {
        let id = Uuid::new_v4();
        assert_eq!(
            format!(r#"{{"id":"{id}"}}"#),
            serde_json::to_string(&User { id, name: None }).unwrap()
        );
        assert_eq!(
            format!(r#"{{"id":"{id}","name":"Robin"}}"#),
            serde_json::to_string(&User {
                id,
                name: Some("Robin".to_owned()),
            })
            .unwrap()
        );
    }
}
