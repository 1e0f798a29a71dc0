//! Drives one full triage session against a running gateway: extract the
//! sample narrative, confirm every bound mention, predict, and print the
//! highlighted text plus the result tables.

use std::env;
use std::sync::Arc;

use tracing::{info, warn};

use triage_flow::{
    HttpBackend, Phase, Segment, Target, TriageSession, reconcile, span_marks,
};

const SAMPLE_TEXT: &str =
    "3歳男児。数日前から発熱と咳が続く。昨日から食欲低下。発熱はあるが嘔吐はない。発熱が続く。";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt().with_env_filter("info").init();

    let gateway_url =
        env::var("GATEWAY_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let text = env::args().nth(1).unwrap_or_else(|| SAMPLE_TEXT.to_string());

    info!("Running triage session against gateway at {}", gateway_url);
    info!("Narrative: {}", text);

    let backend = Arc::new(HttpBackend::new(format!("{}/api", gateway_url)));
    let session = TriageSession::new(backend);

    session.extract(&text).await;
    let snapshot = session.snapshot();

    if snapshot.extract_phase != Phase::Succeeded {
        warn!(
            "extraction did not succeed: {}",
            snapshot.error.as_deref().unwrap_or("unknown error")
        );
        return Ok(());
    }

    let extraction = snapshot.extraction.as_ref().unwrap();
    let plan = reconcile(&extraction.text, &span_marks(&extraction.symptoms));

    let mut rendered = String::new();
    for segment in &plan.segments {
        match segment {
            Segment::Text(t) => rendered.push_str(t),
            Segment::Mark { text, .. } => {
                rendered.push('【');
                rendered.push_str(text);
                rendered.push('】');
            }
        }
    }
    info!("Highlighted narrative: {}", rendered);

    for symptom in &extraction.symptoms {
        info!(
            "mention: {} | hpo: {} | label: {} / {} | evidence: {}",
            symptom.symptom,
            symptom.hpo_id.as_deref().unwrap_or("未確定"),
            symptom.label_en.as_deref().unwrap_or("-"),
            symptom.label_ja.as_deref().unwrap_or("-"),
            symptom.evidence
        );
    }

    session.set_all_confirmed(true);
    let confirmed = session.snapshot().confirmed_hpo_ids();
    if confirmed.is_empty() {
        warn!("no confirmed HPO ids, skipping prediction");
        return Ok(());
    }
    info!("Predicting with {} confirmed HPO id(s): {:?}", confirmed.len(), confirmed);

    session.predict(Target::Omim, 20).await;
    let snapshot = session.snapshot();

    match snapshot.predictions {
        Some(result) => {
            info!("Top {} prediction(s):", result.predictions.len());
            for prediction in &result.predictions {
                info!(
                    "#{} {} | score {} | {} / {}",
                    prediction.rank.map_or("-".to_string(), |r| r.to_string()),
                    prediction.id,
                    prediction
                        .score
                        .map_or("-".to_string(), |s| format!("{s:.4}")),
                    prediction.disease_name_ja.as_deref().unwrap_or("-"),
                    prediction.disease_name_en.as_deref().unwrap_or("-"),
                );
            }
        }
        None => warn!(
            "prediction did not succeed: {}",
            snapshot.error.as_deref().unwrap_or("unknown error")
        ),
    }

    Ok(())
}
