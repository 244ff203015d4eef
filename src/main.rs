use std::env;
use std::error::Error;
use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use docflow::{
    Caller, Decision, DocflowConfig, FileDescriptor, FixedClock, IngestionOutcome,
    IngestionService, LoggingConfig,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = match env::args().nth(1) {
        Some(path) => DocflowConfig::from_file(path)?,
        None => DocflowConfig::default(),
    };
    init_tracing(&config.logging);

    // Replay on a fixed timeline so the output is reproducible.
    let start = Utc
        .with_ymd_and_hms(2024, 1, 13, 16, 45, 0)
        .single()
        .ok_or("invalid replay start time")?;
    let clock = Arc::new(FixedClock::new(start));
    let service = IngestionService::builder()
        .with_config(&config)
        .shared_clock(clock.clone())
        .build()?;

    let maria = Caller::new("maria.santos", "engineer");
    let pedro = Caller::new("pedro.costa", "engineer");
    let ana = Caller::new("ana.lima", "architect");
    let joao = Caller::new("joao.silva", "manager");

    let mut outcomes: Vec<IngestionOutcome> = Vec::new();
    outcomes.extend(service.ingest_as(
        &ana,
        "Projeto Beta",
        &[FileDescriptor::new("planta_baixa_v2.dwg", 3_250_586, "application/acad")],
    ));
    clock.advance(Duration::hours(17));
    outcomes.extend(service.ingest_as(
        &pedro,
        "Projeto Alpha",
        &[
            FileDescriptor::new("memorial_descritivo.pdf", 1_887_437, "application/pdf"),
            FileDescriptor::new("memorial_descritivo_v2.pdf", 1_887_437, "application/pdf"),
        ],
    ));
    clock.advance(Duration::hours(29));
    outcomes.extend(service.ingest_as(
        &maria,
        "Projeto Alpha",
        &[
            FileDescriptor::new("planta_baixa_v1.dwg", 2_621_440, "application/acad"),
            FileDescriptor::new("sketch.exe", 500_000, "application/octet-stream"),
            FileDescriptor::new("levantamento.pdf", 11_000_000, "application/pdf"),
        ],
    ));

    clock.advance(Duration::hours(3));
    let beta_plan = service.resolve("Projeto Beta", "planta_baixa_v2.dwg");
    service.decide_as(
        &joao,
        &beta_plan,
        1,
        Decision::Reject,
        Some("ajustar cotas do pavimento".into()),
    )?;
    let alpha_plan = service.resolve("Projeto Alpha", "planta_baixa_v1.dwg");
    service.decide_as(&joao, &alpha_plan, 1, Decision::Approve, None)?;

    let report = json!({
        "config": config.name,
        "outcomes": outcomes,
        "projects": {
            "Projeto Alpha": service.identities("Projeto Alpha"),
            "Projeto Beta": service.identities("Projeto Beta"),
        },
        "recent": service.recent(5),
        "summary": service.summary(None),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
