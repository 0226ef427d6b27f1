use serde::Serialize;

#[derive(Serialize, Debug, Clone)]
pub struct Health {
    pub status: &'static str,
}

impl Health {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}
