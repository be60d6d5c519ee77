#![no_main]
use libfuzzer_sys::fuzz_target;
use pomedit::PomFile;

fuzz_target!(|data: &[u8]| {
    if let Ok(mut pom) = PomFile::parse(data) {
        pom.set_version("9.9.9-fuzz");
        let first = pom.to_bytes();
        if let Ok(mut reread) = PomFile::parse(&first) {
            assert_eq!(reread.version(), Some("9.9.9-fuzz"));
            assert_eq!(reread.to_bytes(), first);
        }
    }
});
