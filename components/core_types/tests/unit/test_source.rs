//! Unit tests for SourcePosition

use core_types::SourcePosition;

#[cfg(test)]
mod source_position_tests {
    use super::*;

    #[test]
    fn test_source_position_creation() {
        let pos = SourcePosition {
            line: 10,
            column: 5,
            offset: 150,
        };

        assert_eq!(pos.line, 10);
        assert_eq!(pos.column, 5);
        assert_eq!(pos.offset, 150);
    }

    #[test]
    fn test_source_position_start() {
        let pos = SourcePosition::start();

        assert_eq!(pos.line, 1);
        assert_eq!(pos.column, 1);
        assert_eq!(pos.offset, 0);
    }

    #[test]
    fn test_source_position_large_values() {
        let pos = SourcePosition::new(u32::MAX, u32::MAX, usize::MAX);

        assert_eq!(pos.line, u32::MAX);
        assert_eq!(pos.column, u32::MAX);
        assert_eq!(pos.offset, usize::MAX);
    }

    #[test]
    fn test_source_position_copy() {
        let pos1 = SourcePosition::new(42, 7, 1000);
        let pos2 = pos1;

        assert_eq!(pos1, pos2);
    }

    #[test]
    fn test_source_position_display() {
        assert_eq!(SourcePosition::new(3, 14, 40).to_string(), "3:14");
    }

    #[test]
    fn test_source_position_serializes_all_fields() {
        let json = serde_json::to_value(SourcePosition::new(2, 4, 11)).unwrap();
        assert_eq!(json["line"], 2);
        assert_eq!(json["column"], 4);
        assert_eq!(json["offset"], 11);
    }
}
