//! Transcodificación de literales de texto con formato.
//!
//! Cada expresión entre llaves se extrae, en orden, a una lista de
//! argumentos y su lugar en el literal queda marcado con `{}`. El
//! resultado es una lista de argumentos lista para el `print` variádico
//! del preámbulo: `"Hola {}", nombre`.

/// Transcodifica un literal como `f"x = {x}"` a `"x = {}", x`.
pub fn transcode(literal: &str) -> String {
    let body = literal
        .strip_prefix(&['f', 'F'][..])
        .unwrap_or(literal);

    let mut text = String::with_capacity(body.len());
    let mut arguments = Vec::new();

    let mut rest = body;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let close = match after.find('}') {
            Some(close) => close,
            // Llave sin cerrar, se conserva literalmente
            None => break,
        };

        text.push_str(&rest[..open]);
        text.push_str("{}");
        arguments.push(&after[..close]);

        rest = &after[close + 1..];
    }

    text.push_str(rest);
    for argument in arguments {
        text.push_str(", ");
        text.push_str(argument);
    }

    text
}

#[cfg(test)]
mod tests {
    use super::transcode;
    use rstest::rstest;

    #[rstest]
    #[case(r#"f"{a} and {b}""#, r#""{} and {}", a, b"#)]
    #[case(r#"f"x = {x + 1}!""#, r#""x = {}!", x + 1"#)]
    #[case(r#"F'{name}'"#, r#"'{}', name"#)]
    #[case(r#"f"no holes""#, r#""no holes""#)]
    #[case(r#"f"open {brace""#, r#""open {brace""#)]
    fn transcoding(#[case] literal: &str, #[case] expected: &str) {
        assert_eq!(transcode(literal), expected);
    }

    #[test]
    fn arguments_keep_their_order() {
        let out = transcode(r#"f"{second}{first}""#);
        assert_eq!(out, r#""{}{}", second, first"#);
    }
}
