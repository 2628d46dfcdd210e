use log::warn;

/// The builtin font: 16 glyphs for the hex digits 0-F, 5 bytes each,
/// base64-encoded like every fontset handed in through settings.
pub const DEFAULT_FONTSET: &str =
    "8JCQkPAgYCAgcPAQ8IDw8BDwEPCQkPAQEPCA8BDw8IDwkPDwECBAQPCQ8JDw8JDwEPDwkPCQkOCQ4JDg8ICAgPDgkJCQ4PCA8IDw8IDwgIA=";

/// Number of bytes per font glyph, the base of the `FX29` address rule.
pub const GLYPH_LEN: u16 = 5;

/// Decode a caller-supplied fontset, falling back to the builtin one when
/// the source is absent or not valid base64.
pub fn decode_fontset(source: Option<&str>) -> Vec<u8> {
    let default = || base64::decode(DEFAULT_FONTSET).expect("builtin fontset decodes");
    match source {
        None => {
            warn!("no fontset found in settings, using the default fontset");
            default()
        }
        Some(blob) => match base64::decode(blob) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(
                    "error while reading fontset from settings ({}), using the default one",
                    err
                );
                default()
            }
        },
    }
}
