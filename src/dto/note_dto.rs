use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    pub section_id: Option<i32>,
    pub foreign_id: Option<i32>,
    pub note_text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNoteRequest {
    pub note_text: Option<String>,
}
