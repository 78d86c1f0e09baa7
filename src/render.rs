use crate::model::issue::Issue;

/// Selects which issue statuses are rendered and which color each one gets.
///
/// The status set is closed: an issue whose status is not in the active
/// mapping is dropped from the output, silently. That is filtering, not an
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    /// Every known status, including finished ones.
    All,
    /// Only statuses that represent unfinished work.
    OpenOnly,
}

impl StatusFilter {
    pub fn from_flag(open_only: bool) -> Self {
        if open_only {
            StatusFilter::OpenOnly
        } else {
            StatusFilter::All
        }
    }

    /// Background color for a status, or `None` if the status is filtered out.
    fn color_for(self, status: &str) -> Option<&'static str> {
        match status {
            "Open" | "Selected" | "To Do" => Some("#E0E0E0"),
            "In Progress" => Some("#B3F0FF"),
            "Done" | "Resolved" => match self {
                StatusFilter::All => Some("#009A00"),
                StatusFilter::OpenOnly => None,
            },
            _ => None,
        }
    }
}

/// Render issues into the HTML table embedded in the generated page.
///
/// Rows come out in input order; the caller is responsible for sorting.
/// Summary and priority text pass through verbatim, with no HTML escaping.
/// An empty issue list still produces the header row and an empty body.
pub fn render_issues_table(base_url: &str, issues: &[Issue], filter: StatusFilter) -> String {
    let mut text = String::new();
    text.push_str("<table border=\"0\" cellpadding=\"0\" cellspacing=\"1\">\n");
    text.push_str("<theader>\n");
    text.push_str("    <tr align=\"center\" style=\"background-color: #60a9a9;\" valign=\"middle\">\n");
    text.push_str("        <td>ISSUE</td>\n");
    text.push_str("        <td>SUMMARY</td>\n");
    text.push_str("        <td>PRIORITY</td>\n");
    text.push_str("        <td>STATUS</td>\n");
    text.push_str("    </tr>\n");
    text.push_str("</theader>\n");
    text.push_str("<tbody>\n");

    for issue in issues {
        let Some(color) = filter.color_for(&issue.status) else {
            continue;
        };
        text.push_str("    <tr>\n");
        text.push_str(&format!(
            "        <td><a href=\"{base_url}/browse/{key}\">{key}</a></td>\n",
            key = issue.key
        ));
        text.push_str(&format!("        <td>{}</td>\n", issue.summary));
        text.push_str(&format!("        <td>{}</td>\n", issue.priority));
        text.push_str(&format!(
            "        <td style=\"background-color:{color}\">{}</td>\n",
            issue.status
        ));
        text.push_str("    </tr>\n");
    }

    text.push_str("</tbody>\n");
    text.push_str("</table>\n");
    text
}
