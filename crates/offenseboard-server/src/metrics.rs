use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, HistogramVec,
};

pub static QUERIES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!("offenseboard_queries_total", "Queries by entity", &["entity"]).unwrap()
});

pub static QUERY_MATCHED_ROWS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "offenseboard_query_matched_rows",
        "Rows returned per query",
        &["entity"],
        vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 1000.0]
    )
    .unwrap()
});

pub static QUERY_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "offenseboard_query_seconds",
        "Fetch plus filter latency",
        &["entity"]
    )
    .unwrap()
});

pub static UPLOAD_VALIDATIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "offenseboard_upload_validations_total",
        "Upload validations by result",
        &["result"]
    )
    .unwrap()
});
