use seqgen_core::{Alphabet, Domain, Error, Sequence, Symbol};

#[test]
fn parse_list_trims_and_drops_blank_entries() {
    let alphabet = Alphabet::parse_list(" a, b ,,c ,").expect("parse alphabet");
    let symbols = alphabet
        .symbols()
        .iter()
        .map(Symbol::as_str)
        .collect::<Vec<_>>();
    assert_eq!(symbols, vec!["a", "b", "c"]);
}

#[test]
fn parse_list_rejects_duplicates() {
    let result = Alphabet::parse_list("a,b,a,b,c");
    match result {
        Err(Error::InvalidAlphabet(message)) => assert!(message.contains("a, b")),
        other => panic!("expected duplicate error, got {other:?}"),
    }
}

#[test]
fn lists_without_symbols_are_rejected() {
    for input in ["", " , ", ",,,"] {
        assert!(
            matches!(Alphabet::parse_list(input), Err(Error::InvalidAlphabet(_))),
            "'{input}' should be rejected"
        );
    }
}

#[test]
fn empty_alphabets_are_built_explicitly() {
    assert!(Alphabet::empty().is_empty());
    assert_eq!(Alphabet::new(Vec::new()).expect("empty alphabet"), Alphabet::empty());
}

#[test]
fn numeric_domain_uses_digits_and_excludes_leading_zero() {
    let domain = Domain::Numeric;
    let alphabet = domain.alphabet();
    assert_eq!(alphabet.len(), 10);
    assert_eq!(alphabet.symbols()[0].as_str(), "0");

    let zero = Symbol::new("0").expect("symbol");
    let one = Symbol::new("1").expect("symbol");
    assert!(domain.excluded_at_root(&zero));
    assert!(!domain.excluded_at_root(&one));

    let characters = Domain::Characters {
        alphabet: Alphabet::digits(),
    };
    assert!(!characters.excluded_at_root(&zero));
}

#[test]
fn alphabet_deserialization_validates_symbols() {
    let ok: Alphabet = serde_json::from_str(r#"["x","y"]"#).expect("parse alphabet");
    assert_eq!(ok.len(), 2);

    let duplicate = serde_json::from_str::<Alphabet>(r#"["x","x"]"#);
    assert!(duplicate.is_err());

    let empty_symbol = serde_json::from_str::<Alphabet>(r#"["x",""]"#);
    assert!(empty_symbol.is_err());
}

#[test]
fn sequence_displays_concatenated_symbols() {
    let sequence = Sequence::from(vec![
        Symbol::new("1").expect("symbol"),
        Symbol::new("2").expect("symbol"),
        Symbol::new("3").expect("symbol"),
    ]);
    assert_eq!(sequence.to_string(), "123");
    assert_eq!(Sequence::new().to_string(), "");

    let json = serde_json::to_string(&sequence).expect("serialize sequence");
    assert_eq!(json, r#"["1","2","3"]"#);
}
