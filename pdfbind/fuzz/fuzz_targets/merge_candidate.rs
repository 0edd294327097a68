#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfbind::merge::{MergeOutcome, Merger};
use pdfbind::Config;

// Arbitrary bytes stored as a PDF and as an image must never abort the run:
// each candidate either merges or is reported as failed.
fuzz_target!(|data: &[u8]| {
    let dir = tempfile::TempDir::new().unwrap();
    let input = dir.path().join("files");
    std::fs::create_dir(&input).unwrap();
    std::fs::write(input.join("a.pdf"), data).unwrap();
    std::fs::write(input.join("b.png"), data).unwrap();

    let mut config = Config::new(&input, dir.path().join("out.pdf"));
    config.quiet = true;

    match Merger::new().run(&config) {
        Ok(MergeOutcome::Merged(report)) => assert_eq!(report.outcomes.len(), 2),
        other => panic!("unexpected outcome: {other:?}"),
    }
});
