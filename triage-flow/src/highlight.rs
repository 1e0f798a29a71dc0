//! Span reconciliation: turns a set of possibly overlapping annotation spans
//! over a text into a disjoint, ordered rendering plan.
//!
//! Offsets are in characters (code points), matching what the extraction
//! service emits for Japanese narrative text.

use crate::models::NormalizedSymptom;

/// One candidate highlight over the base text, half-open `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanMark {
    pub start: usize,
    pub end: usize,
    pub href: Option<String>,
    pub tooltip: Option<String>,
}

/// One run of the rendered text: either plain text or an accepted highlight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Mark {
        text: String,
        href: Option<String>,
        tooltip: Option<String>,
    },
}

impl Segment {
    pub fn text(&self) -> &str {
        match self {
            Segment::Text(t) => t,
            Segment::Mark { text, .. } => text,
        }
    }
}

/// Ordered segments covering the full input text with no gaps and no
/// overlaps. Concatenating the segment texts reproduces the input exactly.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderPlan {
    pub segments: Vec<Segment>,
}

impl RenderPlan {
    /// The concatenation of all segment texts, equal to the original input.
    pub fn text(&self) -> String {
        self.segments.iter().map(Segment::text).collect()
    }

    pub fn marks(&self) -> impl Iterator<Item = &Segment> {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Mark { .. }))
    }
}

/// Flatten annotations into one mark per span occurrence, carrying the
/// ontology link and a display tooltip.
pub fn span_marks(symptoms: &[NormalizedSymptom]) -> Vec<SpanMark> {
    let mut marks = Vec::new();
    for symptom in symptoms {
        let tooltip = match &symptom.hpo_id {
            Some(id) => format!("{} ({})", symptom.label_ja.as_deref().unwrap_or(""), id),
            None => "未確定 (no candidate fit)".to_string(),
        };
        for span in &symptom.spans {
            marks.push(SpanMark {
                start: span.start,
                end: span.end,
                href: symptom.hpo_url.clone(),
                tooltip: Some(tooltip.clone()),
            });
        }
    }
    marks
}

/// Select a non-overlapping subset of `marks` and build the rendering plan.
///
/// Marks are sorted by start offset ascending, ties broken by length
/// descending, then swept left to right: a mark is dropped if it is empty or
/// reversed, falls outside the text, or overlaps an already accepted mark.
/// Malformed input comes from an upstream service and must never make
/// rendering fail, so dropped marks are not reported.
pub fn reconcile(text: &str, marks: &[SpanMark]) -> RenderPlan {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let slice = |a: usize, b: usize| chars[a..b].iter().collect::<String>();

    let mut sorted: Vec<&SpanMark> = marks.iter().collect();
    sorted.sort_by(|a, b| {
        let len = |m: &SpanMark| m.end.saturating_sub(m.start);
        a.start.cmp(&b.start).then(len(b).cmp(&len(a)))
    });

    let mut segments = Vec::new();
    let mut cursor = 0usize;
    for mark in sorted {
        if mark.end <= mark.start || mark.end > len {
            continue;
        }
        if mark.start < cursor {
            continue;
        }
        if cursor < mark.start {
            segments.push(Segment::Text(slice(cursor, mark.start)));
        }
        segments.push(Segment::Mark {
            text: slice(mark.start, mark.end),
            href: mark.href.clone(),
            tooltip: mark.tooltip.clone(),
        });
        cursor = mark.end;
    }
    if cursor < len {
        segments.push(Segment::Text(slice(cursor, len)));
    }

    RenderPlan { segments }
}
