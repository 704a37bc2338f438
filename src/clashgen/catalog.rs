use serde::Serialize;

/// Server identifiers published in every subscription, in display order.
pub const SERVER_IDS: [&str; 5] = ["us-1", "us-2", "sg-1", "jp-1", "de-1"];

/// Region prefix to flag glyph. Regions absent from this table fall back to
/// [`DEFAULT_GLYPH`] rather than failing.
pub const REGION_GLYPHS: [(&str, &str); 4] = [
    ("us", "\u{1F1FA}\u{1F1F8}"),
    ("sg", "\u{1F1F8}\u{1F1EC}"),
    ("jp", "\u{1F1EF}\u{1F1F5}"),
    ("de", "\u{1F1E9}\u{1F1EA}"),
];

/// White flag, used when a server id carries a region we have no glyph for.
pub const DEFAULT_GLYPH: &str = "\u{1F3F3}\u{FE0F}";

/// One entry of the server list handed to the template as `servers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerDescriptor {
    pub id: String,
    /// Flag glyph followed by the uppercased id, e.g. `"🇺🇸 US-1"`.
    pub name: String,
}

/// Builds one descriptor per id, preserving input order.
///
/// The region is the prefix before the last `-` in the id (`"us-east-1"` maps
/// to region `"us-east"`); an id without a `-` is treated as its own region.
pub fn build_catalog(ids: &[&str], glyphs: &[(&str, &str)]) -> Vec<ServerDescriptor> {
    ids.iter()
        .map(|id| {
            let region = id.rsplit_once('-').map_or(*id, |(prefix, _)| prefix);
            let glyph = glyphs
                .iter()
                .find(|(r, _)| *r == region)
                .map_or(DEFAULT_GLYPH, |(_, g)| g);
            ServerDescriptor {
                id: (*id).to_string(),
                name: format!("{} {}", glyph, id.to_uppercase()),
            }
        })
        .collect()
}

/// The static catalog every run renders with. Pure and idempotent; built once
/// at startup and passed into the pipeline.
pub fn default_catalog() -> Vec<ServerDescriptor> {
    build_catalog(&SERVER_IDS, &REGION_GLYPHS)
}
