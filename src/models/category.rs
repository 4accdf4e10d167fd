use serde::{Deserialize, Serialize};

use super::Resource;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryInput {
    pub name: String,
}

impl Resource for Category {
    type Input = CategoryInput;
    type Query = ();

    const PATH: &'static str = "category";
    const LABEL: &'static str = "category";
    const PLURAL: &'static str = "categories";

    fn id(&self) -> &str {
        &self.id
    }
}
