use crate::shared::{
    entity::{Entity, ID},
    validation::{require_text, ValidationError},
};

#[derive(Debug, Clone, PartialEq)]
pub struct Doctor {
    pub id: ID,
    pub name: String,
    pub specialty: Option<String>,
    pub created: i64,
}

impl Entity for Doctor {
    fn id(&self) -> &ID {
        &self.id
    }
}

impl Doctor {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.name, "name")
    }
}
