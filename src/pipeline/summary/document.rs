use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Display-ready tree built from a summary response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Sections in source order.
    pub sections: Vec<Section>,
}

impl ParsedDocument {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Total number of cards across all card-bearing sections.
    pub fn card_count(&self) -> usize {
        self.sections.iter().map(|s| s.cards().len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub body: SectionBody,
}

impl Section {
    /// Cards of this section; empty for prose sections.
    pub fn cards(&self) -> &[Card] {
        match &self.body {
            SectionBody::Cards(cards) => cards,
            SectionBody::PlainText(_) => &[],
        }
    }

    pub fn is_plain_text(&self) -> bool {
        matches!(self.body, SectionBody::PlainText(_))
    }
}

/// A section is either prose (markup kept verbatim) or a list of event cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum SectionBody {
    PlainText(String),
    Cards(Vec<Card>),
}

/// One diagnostic or treatment event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Title with the date removed.
    pub title: String,
    /// `YYYY-MM-DD` substring found in the heading, as written.
    pub date: Option<String>,
    /// Fields in source line order.
    pub fields: Vec<Field>,
}

impl Card {
    /// The extracted date as a calendar date. `None` when absent or not a real date
    /// (the pattern match does not validate month/day ranges).
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        self.date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    }

    pub fn field(&self, kind: FieldKind) -> Option<&Field> {
        self.fields.iter().find(|f| f.kind == kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub kind: FieldKind,
    /// Text before the label terminator with bold markers removed.
    pub label: Option<String>,
    pub value: String,
}

/// Classification tag; the rendering layer maps it to an icon and color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Hospital,
    Findings,
    MedicationPlan,
    Outcome,
    NextAppointment,
    Generic,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hospital => "hospital",
            Self::Findings => "findings",
            Self::MedicationPlan => "medication_plan",
            Self::Outcome => "outcome",
            Self::NextAppointment => "next_appointment",
            Self::Generic => "generic",
        }
    }
}
