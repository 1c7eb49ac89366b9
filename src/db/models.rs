/// One persisted prize result. Column names follow the `resultados_loteria` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct StoredRow {
    #[sqlx(rename = "titulo")]
    pub title: String,
    #[sqlx(rename = "hora")]
    pub time: String,
    #[sqlx(rename = "premio")]
    pub prize: String,
    #[sqlx(rename = "resultado")]
    pub result: String,
    #[sqlx(rename = "grupo")]
    pub group: String,
    /// Server-assigned insertion timestamp, read back as text
    /// (`YYYY-MM-DD HH:MM:SS[.ffffff]`).
    pub inserted_at: String,
}
