//! Unit tests for per-command segment extraction

use bootcheck::segment::extract_segment;

#[cfg(test)]
mod segment_tests {
    use super::*;

    #[test]
    fn test_segment_is_boundary_exact() {
        let raw = "P>cmd\nout1\nout2\nP>\n";
        assert_eq!(extract_segment(raw, "P>", "cmd"), vec!["out1", "out2"]);
    }

    #[test]
    fn test_marker_must_match_whole_line() {
        // a line merely containing the marker is not a boundary
        let raw = "echo P>cmd here\nP>cmd\nout\nP>\n";
        assert_eq!(extract_segment(raw, "P>", "cmd"), vec!["out"]);
    }

    #[test]
    fn test_ansi_noise_does_not_hide_boundaries() {
        let raw = "\x1b[35mP>\x1b[0mcmd\r\n\x1b[1mout\x1b[0m\r\nP>\x1b[0m\r\n";
        assert_eq!(extract_segment(raw, "P>", "cmd"), vec!["out"]);
    }

    #[test]
    fn test_absent_command_yields_empty_segment() {
        let raw = "P>other\nstuff\nP>\n";
        assert!(extract_segment(raw, "P>", "cmd").is_empty());
    }

    #[test]
    fn test_realistic_gzos_transcript() {
        let raw = concat!(
            "=== Expect Logs ===\n",
            "booting gzos...\r\n",
            "$ \r\n",
            "$ k ut all\r\n",
            "foo : Running 3 tests\r\n",
            "foo : All tests passed (3/3) in 1ms\r\n",
            "$ \r\n",
        );
        assert_eq!(
            extract_segment(raw, "$ ", "k ut all"),
            vec![
                "foo : Running 3 tests",
                "foo : All tests passed (3/3) in 1ms"
            ]
        );
    }
}
