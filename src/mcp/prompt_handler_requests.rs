use serde::Deserialize;

/// Parameters for the analyze-band prompt.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AnalyzeBandParams {
    /// The band whose record to analyze.
    pub band_name: String,
}

/// Parameters for the compare-bands prompt.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CompareBandsParams {
    pub band_a: String,
    pub band_b: String,
}

/// Parameters for the fetch-band-info prompt.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FetchBandInfoParams {
    pub band_name: String,
}
