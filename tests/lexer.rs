/*
 * ==========================================================================
 * NUA - Embeddable Scripting Language
 * ==========================================================================
 *
 * License:
 * This file is part of the NUA programming language project.
 *
 * NUA is dual-licensed under the terms of:
 *   - The MIT License
 *   - The Apache License, Version 2.0
 *
 * You may choose either license to govern your use of this software.
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under these licenses is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *
 * ==========================================================================
 */

use nua::error::LexErrorKind;
use nua::{lex, TokenKind};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn number_value(source: &str) -> f64 {
    let tokens = lex(source).unwrap_or_else(|e| panic!("failed to lex {source:?}: {e}"));
    assert_eq!(tokens.len(), 2, "expected one token in {source:?}");
    assert_eq!(tokens[0].kind, TokenKind::Number);
    tokens[0].text().parse().unwrap()
}

#[test]
fn every_base_spells_the_same_number() {
    assert_eq!(number_value("0x1A"), 26.0);
    assert_eq!(number_value("0b11010"), 26.0);
    assert_eq!(number_value("26"), 26.0);
    assert_eq!(number_value("0XfF"), 255.0);
}

#[test]
fn decimal_forms() {
    assert_eq!(number_value("1.5"), 1.5);
    assert_eq!(number_value("1e3"), 1000.0);
    assert_eq!(number_value("25e-1"), 2.5);
}

#[test]
fn each_escape_yields_one_character() {
    let cases = [
        (r#""\"""#, '"'),
        (r#""\\""#, '\\'),
        (r#""\'""#, '\''),
        (r#""\r""#, '\r'),
        (r#""\n""#, '\n'),
        (r#""\0""#, '\0'),
        (r#""\b""#, '\u{8}'),
        (r#""\t""#, '\t'),
        (r#""\v""#, '\u{b}'),
        (r#""\f""#, '\u{c}'),
        (r#""\a""#, '\u{7}'),
        (r#""\e""#, '\u{1b}'),
    ];

    for (source, expected) in cases {
        let tokens = lex(source).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].text(), expected.to_string(), "lexing {source}");
    }
}

#[test]
fn lexer_errors_carry_their_kind() {
    let kind = |source: &str| lex(source).unwrap_err().kind;

    assert_eq!(kind("\"open"), LexErrorKind::UnterminatedString);
    assert_eq!(kind(r#""\q""#), LexErrorKind::InvalidEscape);
    assert_eq!(kind("0x"), LexErrorKind::InvalidNumber);
    assert_eq!(kind("1e"), LexErrorKind::InvalidNumber);
    assert_eq!(kind("12abc"), LexErrorKind::InvalidNumber);
    assert_eq!(kind("x = $"), LexErrorKind::UnexpectedCharacter);
}

#[test]
fn program_always_ends_in_eof() {
    for source in ["", "   ", "# only a comment", "x = 1"] {
        let tokens = lex(source).unwrap();
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof), "lexing {source:?}");
    }
}

#[test]
fn tokens_serialize_for_editors() {
    let tokens = lex("x").unwrap();
    let json = serde_json::to_value(&tokens[0]).unwrap();

    assert_eq!(json["kind"], "Identifier");
    assert_eq!(json["text"], "x");
    assert_eq!(json["span"]["start"], 0);
    assert_eq!(json["span"]["end"], 1);
}

proptest! {
    #[test]
    fn hex_binary_and_decimal_agree(n in any::<u32>()) {
        let decimal = number_value(&n.to_string());
        prop_assert_eq!(number_value(&format!("0x{n:x}")), decimal);
        prop_assert_eq!(number_value(&format!("0b{n:b}")), decimal);
        prop_assert_eq!(decimal, f64::from(n));
    }

    #[test]
    fn spans_never_overlap(words in proptest::collection::vec("[a-z]{1,6}|[0-9]{1,4}", 1..12)) {
        let source = words.join(" ");
        let tokens = lex(&source).unwrap();

        for pair in tokens.windows(2) {
            prop_assert!(pair[0].span.end <= pair[1].span.start);
        }
    }
}
