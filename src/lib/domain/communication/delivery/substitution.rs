//! Placeholder substitution

use super::PrivateParams;

/// Replace every placeholder token in `body`.
///
/// Pairs are applied in order and each one works on the output of the
/// previous, so a value that contains a later token is substituted again.
pub fn substitute_private_params(body: &str, params: Option<&PrivateParams>) -> String {
    let Some(params) = params else {
        return body.to_string();
    };

    params
        .iter()
        .filter(|(token, _)| !token.is_empty())
        .fold(body.to_string(), |body, (token, value)| {
            body.replace(token, value)
        })
}
