use super::*;
use std::path::PathBuf;

fn fixture(relative: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../tests/fixtures/doc")
        .join(relative);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("{}: {e}", path.display()))
}

const MODERN_TEMPLATE: &str = "(function() {\n    var implementors = Object.fromEntries(LITERAL);\n    if (window.register_implementors) {\n        window.register_implementors(implementors);\n    } else {\n        window.pending_implementors = implementors;\n    }\n})()";

fn modern(literal: &str) -> String {
    MODERN_TEMPLATE.replace("LITERAL", literal)
}

#[test]
fn modern_file_with_single_crate() {
    let parsed = parse_implementors(&fixture("trait.impl/core/fmt/trait.LowerHex.js")).unwrap();
    assert_eq!(parsed.style(), ImplementorStyle::Modern);
    assert_eq!(
        parsed.parts().map(|parts| parts.fragment_lengths()),
        Some(&[993][..])
    );

    let payload = parsed.payload();
    assert_eq!(payload.names().collect::<Vec<_>>(), vec!["generic_array"]);
    let entries = payload.get("generic_array").unwrap();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].html().starts_with("impl&lt;N&gt; <a class=\"trait\""));
    assert!(entries[0].html().contains("<div class=\"where\">where\n    N: "));
}

#[test]
fn modern_file_with_empty_crate() {
    let parsed =
        parse_implementors(&fixture("trait.impl/hybrid_array/traits/trait.AsArrayMut.js"))
            .unwrap();
    let payload = parsed.payload();
    assert_eq!(
        payload.names().collect::<Vec<_>>(),
        vec!["generic_array", "hybrid_array"]
    );
    assert_eq!(payload.get("hybrid_array"), Some(&[][..]));
    assert_eq!(payload.record_count(), 1);
}

#[test]
fn modern_file_with_several_crates() {
    let src = fixture("trait.impl/core/convert/trait.From.js");
    let parsed = parse_implementors(&src).unwrap();
    let payload = parsed.payload();
    assert_eq!(payload.get("generic_array").map(<[_]>::len), Some(30));
    assert_eq!(payload.get("zeroize").map(<[_]>::len), Some(1));

    let fragments = parsed.parts().unwrap().fragments(&src).unwrap();
    assert_eq!(fragments.len(), 2);
    assert!(fragments[1].starts_with("[\"zeroize\","));
    assert!(fragments[1].ends_with("]]]"));
}

#[test]
fn legacy_file() {
    let parsed = parse_implementors(&fixture("implementors/core/marker/trait.Unpin.js")).unwrap();
    assert_eq!(parsed.style(), ImplementorStyle::Legacy);
    assert_eq!(parsed.parts(), None);

    let payload = parsed.payload();
    insta::assert_snapshot!(
        payload.names().collect::<Vec<_>>().join(","),
        @"generic_array,serde,typenum,zeroize"
    );
    assert_eq!(payload.record_count(), 47);

    let typenum = payload.get("typenum").unwrap();
    assert!(typenum.iter().all(ImplementorEntry::is_synthetic));
    assert_eq!(typenum[0].types(), ["typenum::bit::B0".to_string()]);
}

#[test]
fn modern_file_without_parts_header() {
    let parsed =
        parse_implementors(&modern(r#"[["a",[["impl A"]]],["b",[["impl B"],["impl C"]]]]"#))
            .unwrap();
    assert_eq!(parsed.parts(), None);
    assert_eq!(parsed.payload().record_count(), 3);
}

#[test]
fn accurate_parts_header_is_accepted() {
    let literal = r#"[["a",[["impl A"]]],["bb",[]]]"#;
    // "(function() {\n    var implementors = Object.fromEntries([" is 57 bytes
    let src = format!(
        "{}\n//{{\"start\":57,\"fragment_lengths\":[18,10]}}",
        modern(literal)
    );
    let parsed = parse_implementors(&src).unwrap();
    assert_eq!(parsed.parts().map(PartsHeader::start), Some(57));
    assert_eq!(
        parsed.parts().unwrap().fragments(&src).unwrap(),
        vec![r#"["a",[["impl A"]]]"#, r#"["bb",[]]"#]
    );
}

#[test]
fn mismatched_parts_header_is_rejected() {
    let literal = r#"[["a",[["impl A"]]],["bb",[]]]"#;

    for header in [
        r#"{"start":57,"fragment_lengths":[18]}"#,
        r#"{"start":57,"fragment_lengths":[17,10]}"#,
        r#"{"start":56,"fragment_lengths":[18,10]}"#,
        r#"{"start":57,"fragment_lengths":[18,100000]}"#,
    ] {
        let src = format!("{}\n//{header}", modern(literal));
        assert!(parse_implementors(&src).is_err(), "{header}");
    }

    let swapped = format!(
        "{}\n//{{\"start\":57,\"fragment_lengths\":[9,19]}}",
        modern(r#"[["bb",[]],["a",[["impl A"]]]]"#)
    );
    assert!(parse_implementors(&swapped).is_ok());

    let malformed = format!("{}\n//not json", modern(literal));
    assert!(parse_implementors(&malformed).is_err());
}

#[test]
fn missing_registration_pieces_are_errors() {
    assert!(parse_implementors("var implementors = [];").is_err());
    assert!(parse_implementors("(function() {})()").is_err());

    let no_fallback = modern("[]").replace(PENDING_FALLBACK, "window.other = implementors");
    assert!(parse_implementors(&no_fallback).is_err());

    let no_call = modern("[]").replace(REGISTER_CALL, "console.log(implementors)");
    assert!(parse_implementors(&no_call).is_err());

    let no_semicolon = modern("[]").replace(");\n    if", ")\n    if");
    assert!(parse_implementors(&no_semicolon).is_err());
}

#[test]
fn bad_literals_are_errors() {
    assert!(parse_implementors(&modern(r#"[["a",[[1]]]]"#)).is_err());
    assert!(parse_implementors(&modern(r#"[["a""#)).is_err());
}

#[test]
fn desc_shard_fixture() {
    let shard =
        parse_desc_shard(&fixture("search.desc/generic_array/generic_array-desc-0-.js")).unwrap();
    assert_eq!(shard.crate_name(), "generic_array");
    assert_eq!(shard.shard(), 0);
    assert_eq!(shard.descriptions().len(), 89);
    assert_eq!(
        shard.descriptions()[2],
        "The associated <code>ArrayLength</code>"
    );
    assert_eq!(
        shard.descriptions().last().map(String::as_str),
        Some("Unflattens the sequence into a sequence of <code>GenericArray</code>s.")
    );
}

#[test]
fn desc_shard_edge_cases() {
    let shard = parse_desc_shard(r#"searchState.loadedDescShard("a", 3, "");"#).unwrap();
    assert_eq!(shard.into_parts(), ("a".into(), 3, vec![String::new()]));

    let shard = parse_desc_shard("searchState.loadedDescShard(\"b\", 1, \"x\\n\\ny\")\n").unwrap();
    assert_eq!(shard.descriptions(), ["x", "", "y"].map(String::from));

    assert!(parse_desc_shard("searchState.loadedDescShard(\"a\", 0, \"x\"").is_err());
    assert!(parse_desc_shard("searchState.loadedDescShard(\"a\", \"x\")").is_err());
    assert!(parse_desc_shard("searchState.loadedDescShard(\"a\", -1, \"x\")").is_err());
    assert!(parse_desc_shard("loadShard(\"a\", 0, \"x\")").is_err());
}
