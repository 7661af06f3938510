//! Unit tests for transcript sanitization

use bootcheck::sanitize::{sanitize_lines, strip_control_codes};

#[cfg(test)]
mod sanitize_tests {
    use super::*;

    #[test]
    fn test_passthrough_for_plain_lines() {
        for line in ["", "k ut all", "foo : Running 3 tests", "  indented  "] {
            assert_eq!(strip_control_codes(line), line);
        }
    }

    #[test]
    fn test_color_sequences_removed() {
        assert_eq!(
            strip_control_codes("\x1b[1;31mNot all tests passed\x1b[0m"),
            "Not all tests passed"
        );
    }

    #[test]
    fn test_window_parameter_sequences_removed() {
        assert_eq!(
            strip_control_codes("\x1b]2;QEMU (gzos)\x07$ "),
            "$ "
        );
    }

    #[test]
    fn test_trailing_terminators_removed_but_not_spaces() {
        assert_eq!(strip_control_codes("root@FVP:/ \r\n"), "root@FVP:/ ");
    }

    #[test]
    fn test_unterminated_sequence_passes_through() {
        // a CSI with no final byte is not a recognized sequence
        let line = "\x1b[31";
        assert_eq!(strip_control_codes(line), line);
    }

    #[test]
    fn test_sanitize_twice_is_identity() {
        let inputs = [
            "\x1b[32m$ \x1b[0mk ut all\r\n",
            "\x1b]0;title\x07text",
            "plain\r",
        ];
        for input in inputs {
            let once = strip_control_codes(input);
            assert_eq!(strip_control_codes(&once), once);
        }
    }

    #[test]
    fn test_sanitize_lines_keeps_order_and_drops_blanks() {
        let raw = "$ k ut all\r\n\r\nfoo : Running 1 test\r\n$ \r\n";
        assert_eq!(
            sanitize_lines(raw),
            vec!["$ k ut all", "foo : Running 1 test", "$ "]
        );
    }
}
