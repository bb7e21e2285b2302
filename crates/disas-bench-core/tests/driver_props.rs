#![cfg(not(target_arch = "wasm32"))]

mod common;

use common::{ByteRule, XorShift64};
use disas_bench_core::{run, scan, Counts, FormatBuf, RunOptions};
use proptest::prelude::*;

fn counted(loop_count: usize, format: bool) -> RunOptions {
    RunOptions {
        loop_count,
        format,
        count: true,
    }
}

fn round_counts(code: &[u8]) -> (Counts, usize, usize) {
    let mut backend = ByteRule::default();
    let mut counts = Counts::default();
    let end = scan(&mut backend, code, None, &mut counts);
    (counts, end, backend.decodes)
}

#[test]
fn empty_buffer_makes_no_decode_attempts() {
    let mut backend = ByteRule::default();
    let stats = run(&mut backend, &[], &counted(5, true));
    assert_eq!(backend.decodes, 0);
    assert_eq!(backend.formats, 0);
    assert_eq!(stats.counts, Some(Counts::default()));
    assert_eq!(stats.rounds, 5);
    assert_eq!(stats.code_len, 0);
}

#[test]
fn invalid_first_byte_then_three_byte_instruction() {
    // 0x04 % 4 == 0 (invalid), 0x03 % 4 == 3 (three bytes).
    let (counts, end, attempts) = round_counts(&[0x04, 0x03, 0xAA, 0xBB]);
    assert_eq!(counts, Counts { valid: 1, invalid: 1 });
    assert_eq!(end, 4);
    assert_eq!(attempts, 2);
}

#[test]
fn large_pseudo_random_buffer_matches_reference_walk() {
    let mut code = vec![0u8; 64 * 1024];
    XorShift64(0x1234_5678_9ABC_DEF0).fill(&mut code);

    let (valid, invalid) = ByteRule::expected(&code);
    let mut backend = ByteRule::default();
    let stats = run(&mut backend, &code, &counted(3, true));
    let counts = stats.counts.expect("counting run");
    assert_eq!(counts.valid, valid * 3);
    assert_eq!(counts.invalid, invalid * 3);
    assert_eq!(backend.formats as u64, valid * 3);
}

#[test]
fn formatter_output_lands_in_scratch_buffer() {
    let mut backend = ByteRule::default();
    let mut text = FormatBuf::new();
    let mut counts = Counts::default();
    scan(&mut backend, &[0x02, 0x00], Some(&mut text), &mut counts);
    assert_eq!(text.as_str(), "insn/2");
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 512,
        .. ProptestConfig::default()
    })]

    #[test]
    fn scan_terminates_and_conserves_attempts(code in proptest::collection::vec(any::<u8>(), 0..512)) {
        let (counts, end, attempts) = round_counts(&code);
        prop_assert_eq!(counts.total(), attempts as u64);
        prop_assert!(attempts <= code.len());
        prop_assert!(end >= code.len());
        // The last step advances by at most 3 bytes.
        prop_assert!(end < code.len() + 3 || code.is_empty());
        let (valid, invalid) = ByteRule::expected(&code);
        prop_assert_eq!((counts.valid, counts.invalid), (valid, invalid));
    }

    #[test]
    fn rounds_are_identical(code in proptest::collection::vec(any::<u8>(), 0..256), rounds in 1usize..6) {
        let mut backend = ByteRule::default();
        let mut per_round = Vec::with_capacity(rounds);
        for _ in 0..rounds {
            let mut counts = Counts::default();
            scan(&mut backend, &code, None, &mut counts);
            per_round.push(counts);
        }
        prop_assert!(per_round.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn counters_scale_with_loop_count(code in proptest::collection::vec(any::<u8>(), 0..256), k in 1usize..8) {
        let once = run(&mut ByteRule::default(), &code, &counted(1, false)).counts.unwrap();
        let many = run(&mut ByteRule::default(), &code, &counted(k, false)).counts.unwrap();
        prop_assert_eq!(many.valid, once.valid * k as u64);
        prop_assert_eq!(many.invalid, once.invalid * k as u64);
    }

    #[test]
    fn formatting_toggle_does_not_change_counters(code in proptest::collection::vec(any::<u8>(), 0..256), k in 0usize..4) {
        let mut with_fmt = ByteRule::default();
        let mut without_fmt = ByteRule::default();
        let a = run(&mut with_fmt, &code, &counted(k, true));
        let b = run(&mut without_fmt, &code, &counted(k, false));
        prop_assert_eq!(a.counts, b.counts);
        prop_assert_eq!(without_fmt.formats, 0);
        prop_assert_eq!(with_fmt.formats as u64, a.counts.unwrap().valid);
    }
}
