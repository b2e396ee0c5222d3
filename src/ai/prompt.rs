/// Generate a prompt asking Claude to turn a raw progress file into a report
pub fn generate_report_prompt(repository: &str, period_days: u32, raw_report: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str("You are helping a team keep track of an open-source project.\n\n");
    prompt.push_str(&format!("Repository: {}\n", repository));
    prompt.push_str(&format!("Period: last {} day(s)\n\n", period_days));

    prompt.push_str("Below is the raw activity for this period: commits (message and short hash), ");
    prompt.push_str("issues and pull requests (title, number and state).\n\n");
    prompt.push_str("<activity>\n");
    prompt.push_str(raw_report.trim());
    prompt.push_str("\n</activity>\n\n");

    // Instructions
    prompt.push_str("Write a concise progress report in markdown with these sections:\n\n");
    prompt.push_str("## New Features\n");
    prompt.push_str("## Bug Fixes\n");
    prompt.push_str("## Improvements\n");
    prompt.push_str("## Open Work\n\n");
    prompt.push_str("Group related items, refer to issues and pull requests by number, ");
    prompt.push_str("and omit a section entirely if nothing belongs in it. ");
    prompt.push_str("If there was no activity at all, say so in one sentence.\n");

    prompt
}

/// Read the repository identifier back out of a raw report's title line
pub fn repository_from_raw(raw_report: &str) -> Option<String> {
    let title = raw_report.lines().next()?;
    let rest = title.strip_prefix("# Progress for ")?;
    let (repository, _) = rest.rsplit_once(" (")?;
    Some(repository.to_string())
}
