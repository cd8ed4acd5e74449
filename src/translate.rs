//! Traducción de diagnósticos del compilador nativo.
//!
//! Los mensajes del compilador nativo hablan del código generado, no del
//! programa que escribió el usuario. Esta fase conserva únicamente las
//! líneas de error, descarta las posiciones (que apuntan a la unidad
//! generada, no al programa original) y reescribe la terminología del
//! lenguaje objetivo con la del dialecto.

use std::cmp::Reverse;

use crate::tables::Tables;

const ERROR: &str = "error:";

/// Escritura interna de `std::string` en libstdc++.
const STRING_INTERNAL: &str = "std::__cxx11::basic_string<char>";

/// Traduce la salida de error del compilador nativo.
///
/// Si ninguna línea es un error reconocible, el resultado es la primera
/// línea no vacía de la salida original.
pub fn translate(stderr: &str) -> String {
    let tables = Tables::standard();
    let mut messages: Vec<String> = Vec::new();

    for line in stderr.lines() {
        let message = match line.find(ERROR) {
            Some(at) => &line[at + ERROR.len()..],
            None => continue,
        };

        let message = rewrite(message.trim(), tables);
        if !message.is_empty() && !messages.contains(&message) {
            messages.push(message);
        }
    }

    if messages.is_empty() {
        return stderr
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or_default()
            .to_owned();
    }

    messages
        .iter()
        .map(|message| format!("error: {}", message))
        .collect::<Vec<_>>()
        .join("\n")
}

fn rewrite(message: &str, tables: &Tables) -> String {
    let mut text: String = message
        .chars()
        .map(|c| match c {
            '‘' | '’' => '\'',
            '“' | '”' => '"',
            c => c,
        })
        .collect();

    text = text.replace(STRING_INTERNAL, "str");

    // Las escrituras más largas primero: `list<std::string>` contiene
    // a `std::string`
    let mut types: Vec<_> = tables.types().pairs().collect();
    types.sort_by_key(|&(_, target)| Reverse(target.len()));

    for (dialect, target) in types {
        text = replace_word(&text, target, dialect);
    }

    for (target, dialect) in tables.operators().words() {
        text = replace_operator(&text, target, dialect);
    }

    text
}

fn is_identifier(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Reemplaza `from` solo donde no forma parte de un identificador mayor.
fn replace_word(text: &str, from: &str, to: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for (at, _) in text.match_indices(from) {
        let end = at + from.len();
        let before = text[..at].chars().next_back();
        let after = text[end..].chars().next();

        if before.map_or(false, is_identifier) || after.map_or(false, is_identifier) {
            continue;
        }

        out.push_str(&text[last..at]);
        out.push_str(to);
        last = end;
    }

    out.push_str(&text[last..]);
    out
}

/// Reemplaza un operador simbólico por su palabra en el dialecto.
fn replace_operator(text: &str, from: &str, to: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for (at, _) in text.match_indices(from) {
        let end = at + from.len();
        let before = text[..at].chars().next_back();
        let after = text[end..].chars().next();

        // `!=` no es una negación
        if after == Some('=') {
            continue;
        }

        out.push_str(&text[last..at]);
        if before.map_or(false, is_identifier) {
            out.push(' ');
        }

        out.push_str(to);
        if after.map_or(false, is_identifier) {
            out.push(' ');
        }

        last = end;
    }

    out.push_str(&text[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::translate;
    use rstest::rstest;

    #[test]
    fn keeps_only_errors_without_positions() {
        let stderr = "<stdin>: In function 'int main()':\n\
                      <stdin>:3:5: error: 'x' was not declared in this scope\n\
                      <stdin>:1:1: note: suggested alternative\n";

        assert_eq!(
            translate(stderr),
            "error: 'x' was not declared in this scope"
        );
    }

    #[rstest]
    #[case(
        "<stdin>:4:1: error: cannot convert ‘std::__cxx11::basic_string<char>’ to ‘long long int’",
        "error: cannot convert 'str' to 'int'"
    )]
    #[case(
        "<stdin>:2:9: error: invalid use of ‘void f()’",
        "error: invalid use of 'None f()'"
    )]
    #[case(
        "<stdin>:2:9: error: ‘avoid’ was not declared in this scope",
        "error: 'avoid' was not declared in this scope"
    )]
    #[case(
        "<stdin>:7:2: error: no match for ‘operator[]’ (operand type is ‘list<std::string>’)",
        "error: no match for 'operator[]' (operand type is 'list')"
    )]
    #[case(
        "<stdin>:1:1: error: ‘long double’ and ‘std::string’ differ",
        "error: 'float' and 'str' differ"
    )]
    fn types_are_spelled_as_in_the_dialect(#[case] stderr: &str, #[case] expected: &str) {
        assert_eq!(translate(stderr), expected);
    }

    #[rstest]
    #[case("error: no match for ‘operator&&’", "error: no match for 'operator and'")]
    #[case("error: bad operand in ‘!flag’", "error: bad operand in 'not flag'")]
    #[case("error: in ‘a||b’", "error: in 'a or b'")]
    #[case("error: in ‘a != b’", "error: in 'a != b'")]
    fn word_operators_are_restored(#[case] stderr: &str, #[case] expected: &str) {
        assert_eq!(translate(stderr), expected);
    }

    #[test]
    fn duplicates_are_reported_once() {
        let stderr = "<stdin>:1:1: error: expected ';'\n\
                      <stdin>:9:4: error: expected ';'\n\
                      <stdin>:9:9: error: expected '}'\n";

        assert_eq!(translate(stderr), "error: expected ';'\nerror: expected '}'");
    }

    #[rstest]
    #[case("\n   \n  collect2: ld returned 1 exit status\nmore\n", "collect2: ld returned 1 exit status")]
    #[case("", "")]
    fn falls_back_to_the_first_line(#[case] stderr: &str, #[case] expected: &str) {
        assert_eq!(translate(stderr), expected);
    }
}
