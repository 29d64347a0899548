//! Fabricated source text for the demo analysis flow.
//!
//! Uploaded files never leave the browser, so the backend invents a code
//! sample per file based on nothing but the extension. Four buckets:
//! js/jsx, py, java, and everything else. Pure, deterministic, always
//! non-empty.

const JS_SNIPPET: &str = r#"function renderUserCard(user) {
  const container = document.getElementById("team-list");
  // Interpolates unescaped user input straight into markup.
  container.innerHTML += `<div class="card"><h3>${user.name}</h3><p>${user.bio}</p></div>`;
  return container;
}

export function renderTeam(users) {
  users.forEach(renderUserCard);
}
"#;

const PY_SNIPPET: &str = r#"def summarize_sprint(report):
    totals = {}
    for entry in report["entries"]:
        # KeyError when an entry has no 'points' field.
        totals[entry["owner"]] = totals.get(entry["owner"], 0) + entry["points"]
    return totals


def top_contributor(report):
    totals = summarize_sprint(report)
    return max(totals, key=totals.get)
"#;

const JAVA_SNIPPET: &str = r#"public class TaskBoard {
    private Task[] tasks;

    public int countOpen() {
        int open = 0;
        // Off-by-one: walks one past the last element.
        for (int i = 0; i <= tasks.length; i++) {
            if (tasks[i].isOpen()) {
                open++;
            }
        }
        return open;
    }

    public String firstAssignee() {
        // tasks[0] may be null after a board reset.
        return tasks[0].getAssignee().toUpperCase();
    }
}
"#;

const GENERIC_SNIPPET: &str = r#"// Generic demo module.
config = load_config()
connection = open_connection(config.host)
result = connection.fetch_all()
print(result)
"#;

/// Return a fixed code sample for `file_name`, selected by extension bucket.
pub fn generate(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "js" | "jsx" => JS_SNIPPET,
        "py" => PY_SNIPPET,
        "java" => JAVA_SNIPPET,
        _ => GENERIC_SNIPPET,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_by_extension() {
        assert_eq!(generate("app.js"), JS_SNIPPET);
        assert_eq!(generate("App.jsx"), JS_SNIPPET);
        assert_eq!(generate("report.py"), PY_SNIPPET);
        assert_eq!(generate("Board.java"), JAVA_SNIPPET);
        assert_eq!(generate("main.go"), GENERIC_SNIPPET);
    }

    #[test]
    fn extension_is_case_insensitive_and_last_dot_wins() {
        assert_eq!(generate("Main.JAVA"), JAVA_SNIPPET);
        assert_eq!(generate("bundle.min.JS"), JS_SNIPPET);
    }

    #[test]
    fn no_extension_falls_back_to_generic() {
        assert_eq!(generate("Makefile"), GENERIC_SNIPPET);
        assert_eq!(generate(""), GENERIC_SNIPPET);
    }

    #[test]
    fn always_non_empty() {
        for name in ["a.js", "a.py", "a.java", "a", "a.rs"] {
            assert!(!generate(name).is_empty());
        }
    }
}
