use x509_parser::pem::Pem;

use crate::PkiError;

pub(crate) fn blocks(input: &[u8], labels: &[&str]) -> Result<Vec<Pem>, PkiError> {
    let mut out = Vec::new();
    for pem in Pem::iter_from_buffer(input) {
        let pem = pem.map_err(|e| PkiError::Pem(e.to_string()))?;
        if labels.contains(&pem.label.as_str()) {
            out.push(pem);
        }
    }
    Ok(out)
}

pub(crate) fn first(input: &[u8], labels: &[&str]) -> Result<Pem, PkiError> {
    blocks(input, labels)?.into_iter().next().ok_or_else(|| missing(labels))
}

pub(crate) fn missing(labels: &[&str]) -> PkiError {
    PkiError::MissingBlock { path: "input".into(), labels: labels.join(" or ") }
}
