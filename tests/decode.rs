//! Integration tests for list decoding.

mod common;

use common::{contiguous, ScriptedSource};
use getargv::decode::{spans, Span};
use getargv::source::{procargs, PointerTable};
use getargv::{ArgvError, FixtureSource, Getargv, RawSignal};

const PID: u32 = 31337;

#[test]
fn test_as_strings_returns_args_in_order() {
    let args = ["/bin/sh", "-c", "echo hi", "", "last"];
    let getargv = Getargv::new(FixtureSource::new(PID, &args[..3]));
    assert_eq!(getargv.as_strings(PID).unwrap(), vec!["/bin/sh", "-c", "echo hi"]);

    // Empty arguments in the middle survive decoding.
    let (arena, offsets) = contiguous(&args);
    let count = offsets.len();
    let source = ScriptedSource::table(PointerTable::new(arena, offsets, count));
    assert_eq!(Getargv::new(&source).as_strings(1).unwrap(), args);
}

#[test]
fn test_lengths_one_two_three() {
    let (arena, offsets) = contiguous(&["a", "bb", "ccc"]);
    let table = PointerTable::new(arena, offsets, 3);

    let spans = spans(&table).unwrap();
    assert_eq!(
        spans,
        vec![
            Span { offset: 0, len: 1 },
            Span { offset: 2, len: 2 },
            Span { offset: 5, len: 3 },
        ]
    );

    let source = ScriptedSource::table(table);
    assert_eq!(Getargv::new(&source).as_strings(1).unwrap(), vec!["a", "bb", "ccc"]);
}

#[test]
fn test_last_argument_ignores_trailing_environment() {
    let region = procargs::encode(b"/bin/prog", &["prog", "arg"], &["PATH=/bin"]);
    let getargv = Getargv::new(FixtureSource::from_region(PID, region));
    assert_eq!(getargv.as_strings(PID).unwrap(), vec!["prog", "arg"]);
}

#[test]
fn test_zero_count_is_empty_and_released() {
    let source = ScriptedSource::table(PointerTable::new(Vec::new(), Vec::new(), 0));
    let getargv = Getargv::new(&source);

    assert!(getargv.as_strings(1).unwrap().is_empty());
    assert_eq!(source.releases(), 1);
}

#[test]
fn test_zero_count_ignores_stray_entries() {
    let source = ScriptedSource::table(PointerTable::new(b"x\0".to_vec(), vec![0], 0));
    assert!(Getargv::new(&source).as_strings(1).unwrap().is_empty());
}

#[test]
fn test_malformed_table_is_released() {
    let source = ScriptedSource::table(PointerTable::new(b"abc".to_vec(), vec![0], 1));
    let getargv = Getargv::new(&source);

    assert_eq!(getargv.as_strings(1), Err(ArgvError::MalformedSourceData));
    assert_eq!(source.fetches(), 1);
    assert_eq!(source.releases(), 1);
}

#[test]
fn test_failures_map_to_kinds() {
    let getargv = Getargv::new(FixtureSource::new(PID, &["prog"]));
    assert_eq!(getargv.as_strings(0), Err(ArgvError::PermissionDenied));
    assert_eq!(getargv.as_strings(99999 + 1), Err(ArgvError::NoSuchProcess));
    assert_eq!(getargv.source().fetches(), 0);

    let source = ScriptedSource::failing(RawSignal::too_large());
    assert_eq!(Getargv::new(&source).as_strings(1), Err(ArgvError::ArgumentsTooLarge));
}

#[test]
fn test_bytes_split_on_terminator_match_list() {
    let args = ["prog", "--flag=value", "two words", "x"];
    let getargv = Getargv::new(FixtureSource::new(PID, &args));

    let bytes = getargv.as_bytes(PID, 0, false).unwrap();
    let mut split: Vec<String> = bytes
        .split(|&b| b == 0)
        .map(|part| String::from_utf8(part.to_vec()).unwrap())
        .collect();
    if split.last().is_some_and(String::is_empty) {
        split.pop();
    }

    assert_eq!(split, getargv.as_strings(PID).unwrap());
    assert_eq!(getargv.source().outstanding(), 0);
}

#[test]
fn test_as_strings_is_unaffected_by_substitution_options() {
    let getargv = Getargv::new(FixtureSource::new(PID, &["prog", "a b", "c"]));
    let _ = getargv.as_string(PID, 1, true).unwrap();
    assert_eq!(getargv.as_strings(PID).unwrap(), vec!["prog", "a b", "c"]);
}
