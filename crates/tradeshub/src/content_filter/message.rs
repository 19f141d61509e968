use super::FilterIssue;

/// Render issues as one line per field, joining that field's messages with `"; "`.
///
/// Fields appear in the order they were first reported.
pub fn generate_filter_error_message(issues: &[FilterIssue]) -> String {
    let mut grouped: Vec<(&str, Vec<&str>)> = Vec::new();

    for issue in issues {
        match grouped.iter_mut().find(|(field, _)| *field == issue.field) {
            Some((_, messages)) => messages.push(issue.message.as_str()),
            None => grouped.push((issue.field.as_str(), vec![issue.message.as_str()])),
        }
    }

    grouped
        .into_iter()
        .map(|(field, messages)| format!("{field}: {}", messages.join("; ")))
        .collect::<Vec<_>>()
        .join("\n")
}
