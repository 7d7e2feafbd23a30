//! Prompt templates (§11): canned analysis prompts a client can surface to
//! the user, each grounded in one or more core operations.

pub fn analyze_band_prompt(band_name: &str) -> String {
    format!(
        "Use the `get_band` tool to fetch \"{band}\"'s record, then summarize its \
discography: how many albums are local vs missing, what album types are \
represented, and whether its metadata and analysis are complete. Call out \
any gaps worth filling in.",
        band = band_name
    )
}

pub fn compare_bands_prompt(band_a: &str, band_b: &str) -> String {
    format!(
        "Use the `get_band` tool to fetch the records for \"{a}\" and \"{b}\", \
then compare their collection completion rates, album type diversity, and \
analysis coverage. Recommend which one needs attention first.",
        a = band_a,
        b = band_b
    )
}

pub fn fetch_band_info_prompt(band_name: &str) -> String {
    format!(
        "Fetch the `band://{band}/info` resource and present its metadata \
(formed year, genres, origin, members, description) in a readable form. If \
metadata is missing, note which fields are empty.",
        band = band_name
    )
}

pub fn collection_insights_prompt() -> String {
    "Run the `analytics` tool (or fetch the `collection://insights` resource) \
and produce a short written report covering the collection's maturity \
level, health score, type diversity, and the top 3 type recommendations or \
edition upgrades worth acting on first."
        .to_string()
}
