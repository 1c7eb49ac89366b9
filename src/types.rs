use serde::Serialize;

// ---------------------------------------------------------------------------
// Scraped records
// ---------------------------------------------------------------------------

/// One titled, timed group of prize results as published by the source page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCard {
    pub title: String,
    pub time: String,
    pub results: Vec<PrizeResult>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrizeResult {
    pub prize: String,
    pub result: String,
    pub group: String,
}

// ---------------------------------------------------------------------------
// Read-side projection
// ---------------------------------------------------------------------------

/// Grouping key for stored rows. Kept as two fields so that ("AB", "C") and
/// ("A", "BC") never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CardKey {
    pub title: String,
    pub time: String,
}

/// A card rebuilt from persisted rows. Field names follow the public JSON contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupedCard {
    #[serde(rename = "Titulo")]
    pub title: String,
    #[serde(rename = "Hora")]
    pub time: String,
    /// Insertion date of the first row seen for this card, `DD/MM/YYYY`.
    #[serde(rename = "Dia")]
    pub day: String,
    #[serde(rename = "Resultados")]
    pub results: Vec<GroupedResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupedResult {
    #[serde(rename = "Premio")]
    pub prize: String,
    #[serde(rename = "Resultado")]
    pub result: String,
    #[serde(rename = "Grupo")]
    pub group: String,
}

// ---------------------------------------------------------------------------
// Run outcome
// ---------------------------------------------------------------------------

/// What a single writer run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveReport {
    pub inserted: u64,
    pub duplicates: u64,
}

impl std::fmt::Display for SaveReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "inserted={} duplicates={}", self.inserted, self.duplicates)
    }
}
