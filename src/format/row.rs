//! One line of the persisted tracks format.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::store::{Detection, Rect};

/// MOT class code for pedestrians, the one class this store keeps. Rows of
/// any other class are read and discarded.
pub const PEDESTRIAN_CLASS: u32 = 1;

/// One text record: `frame,id,x,y,width,height,confidence,class`.
///
/// `frame` is 1-based on disk; the store converts on the way in and out.
/// Anything past the eighth field is ignored, so MOT ground-truth files
/// with a trailing visibility column parse as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Row {
    pub frame: usize,
    pub id: u64,
    pub bbox: Rect,
    pub confidence: f32,
    pub class: u32,
}

/// Why a line could not be read as a [`Row`].
#[derive(Debug, Error)]
pub enum ParseRowError {
    #[error("expected 8 comma-separated fields, got {0}")]
    FieldCount(usize),
    #[error("invalid {field}: {value:?}")]
    Field { field: &'static str, value: String },
}

impl Row {
    /// The on-disk form of `det`: 1-based frame, fixed pedestrian class.
    pub fn from_detection(det: &Detection) -> Self {
        Self {
            frame: det.frame + 1,
            id: det.id,
            bbox: det.bbox,
            confidence: det.confidence,
            class: PEDESTRIAN_CLASS,
        }
    }
}

fn field<T: FromStr>(fields: &[&str], idx: usize, name: &'static str) -> Result<T, ParseRowError> {
    fields[idx].parse().map_err(|_| ParseRowError::Field {
        field: name,
        value: fields[idx].to_string(),
    })
}

impl FromStr for Row {
    type Err = ParseRowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(',').map(str::trim).collect();
        if fields.len() < 8 {
            return Err(ParseRowError::FieldCount(fields.len()));
        }

        Ok(Self {
            frame: field(&fields, 0, "frame")?,
            id: field(&fields, 1, "id")?,
            bbox: Rect::new(
                field(&fields, 2, "x")?,
                field(&fields, 3, "y")?,
                field(&fields, 4, "width")?,
                field(&fields, 5, "height")?,
            ),
            confidence: field(&fields, 6, "confidence")?,
            class: field(&fields, 7, "class")?,
        })
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{},{},{}",
            self.frame,
            self.id,
            self.bbox.x,
            self.bbox.y,
            self.bbox.width,
            self.bbox.height,
            self.confidence,
            self.class
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_row() {
        let row: Row = "12,3,10.5,20,30,40,0.87,1".parse().unwrap();
        assert_eq!(row.frame, 12);
        assert_eq!(row.id, 3);
        assert_eq!(row.bbox, Rect::new(10.5, 20.0, 30.0, 40.0));
        assert_eq!(row.confidence, 0.87);
        assert_eq!(row.class, PEDESTRIAN_CLASS);
    }

    #[test]
    fn test_parse_tolerates_spaces_and_extra_fields() {
        // MOT gt layout: trailing visibility column.
        let row: Row = " 1, 2, 0, 0, 5, 5, 1.0, 1, 0.93".parse().unwrap();
        assert_eq!(row.frame, 1);
        assert_eq!(row.id, 2);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "1,2,3".parse::<Row>(),
            Err(ParseRowError::FieldCount(3))
        ));
        assert!(matches!(
            "1,2,abc,0,5,5,1.0,1".parse::<Row>(),
            Err(ParseRowError::Field { field: "x", .. })
        ));
    }

    #[test]
    fn test_display_round_trips() {
        let det = Detection::new(4, 7, Rect::new(1.5, 2.5, 3.0, 4.0), 0.75);
        let row = Row::from_detection(&det);
        assert_eq!(row.frame, 5); // 1-based on disk

        let reparsed: Row = row.to_string().parse().unwrap();
        assert_eq!(reparsed, row);
    }
}
