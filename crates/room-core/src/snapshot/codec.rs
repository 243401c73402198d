//! JSON encoding of [`LayoutSnapshot`].
//!
//! # Wire format
//!
//! ```json
//! {
//!   "version": 1,
//!   "room": { "width": 20.0, "length": 20.0, "height": 8.0 },
//!   "items": [
//!     { "id": "0b6f…", "kind": "sofa", "position": [0.0, 1.0, 0.0],
//!       "rotation_y": 0.0, "color": "#D4AF37" }
//!   ]
//! }
//! ```
//!
//! Decoding only checks shape (required fields, types, color syntax).  Domain
//! validation happens in [`super::deserialize`].

use tracing::debug;

use super::LayoutSnapshot;
use crate::domain::error::LayoutError;

/// Encodes a snapshot as compact JSON text.
///
/// # Errors
///
/// Returns [`LayoutError::MalformedSnapshot`] if serde_json refuses the value.
pub fn encode_snapshot(snapshot: &LayoutSnapshot) -> Result<String, LayoutError> {
    serde_json::to_string(snapshot).map_err(|e| LayoutError::MalformedSnapshot(e.to_string()))
}

/// Decodes snapshot JSON text.
///
/// # Errors
///
/// Returns [`LayoutError::MalformedSnapshot`] if a required field is missing,
/// has the wrong type, or the text is not JSON.
pub fn decode_snapshot(text: &str) -> Result<LayoutSnapshot, LayoutError> {
    let snapshot: LayoutSnapshot = serde_json::from_str(text).map_err(|e| {
        debug!("snapshot decode failed: {e}");
        LayoutError::MalformedSnapshot(e.to_string())
    })?;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{SnapshotItem, SnapshotRoom, SNAPSHOT_VERSION};
    use crate::Rgb;
    use uuid::Uuid;

    fn sample() -> LayoutSnapshot {
        LayoutSnapshot {
            version: SNAPSHOT_VERSION,
            room: SnapshotRoom {
                width: 20.0,
                length: 20.0,
                height: 8.0,
            },
            items: vec![SnapshotItem {
                id: Uuid::new_v4(),
                kind: "sofa".into(),
                position: [0.0, 1.0, 0.0],
                rotation_y: 0.0,
                color: Rgb::new(0xD4, 0xAF, 0x37),
            }],
        }
    }

    #[test]
    fn test_encode_uses_documented_field_names() {
        let json = encode_snapshot(&sample()).unwrap();
        for field in [
            "\"version\"",
            "\"room\"",
            "\"items\"",
            "\"rotation_y\"",
            "\"position\":[0.0,1.0,0.0]",
        ] {
            assert!(json.contains(field), "missing {field} in {json}");
        }
        assert!(json.contains("\"color\":\"#D4AF37\""));
    }

    #[test]
    fn test_decode_reads_encoded_text_back() {
        let original = sample();
        let decoded = decode_snapshot(&encode_snapshot(&original).unwrap()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_decode_missing_room_is_malformed() {
        let result = decode_snapshot(r#"{"version": 1, "items": []}"#);
        assert!(matches!(result, Err(LayoutError::MalformedSnapshot(_))));
    }

    #[test]
    fn test_decode_item_without_rotation_is_malformed() {
        let text = r##"{"version":1,"room":{"width":5,"length":5,"height":8},
            "items":[{"id":"5f0c8a52-7d3b-4c1e-9a53-2f1e4b6d7c80","kind":"chair",
                      "position":[0,0,0],"color":"#000000"}]}"##;
        assert!(matches!(decode_snapshot(text), Err(LayoutError::MalformedSnapshot(_))));
    }

    #[test]
    fn test_decode_bad_color_is_malformed() {
        let text = r#"{"version":1,"room":{"width":5,"length":5,"height":8},
            "items":[{"id":"5f0c8a52-7d3b-4c1e-9a53-2f1e4b6d7c80","kind":"chair",
                      "position":[0,0,0],"rotation_y":0,"color":"gold"}]}"#;
        assert!(matches!(decode_snapshot(text), Err(LayoutError::MalformedSnapshot(_))));
    }

    #[test]
    fn test_decode_non_json_is_malformed() {
        assert!(matches!(decode_snapshot("not json"), Err(LayoutError::MalformedSnapshot(_))));
    }
}
