//! Box-drawing tree dump helpers.

/// Renders one child subtree given the indentation prefix for its lines.
pub(crate) type PrintChild<'a> = dyn Fn(&str) -> String + 'a;

/// Renders `children` as branches hanging below the current line.
///
/// Absent trailing children are skipped; an absent child in the middle keeps
/// its slot as a bare `│` so left/right positions stay readable.
pub(crate) fn print_tree(tab: &str, children: &[Option<&PrintChild<'_>>]) -> String {
    let mut out = String::new();
    let Some(last) = children.iter().rposition(Option::is_some) else {
        return out;
    };

    for (i, child) in children.iter().enumerate().take(last + 1) {
        let is_last = i == last;
        let rendered = match child {
            Some(render) => render(&format!("{tab}{}  ", if is_last { " " } else { "│" })),
            None => String::new(),
        };
        let branch = if rendered.is_empty() {
            "│"
        } else if is_last {
            "└─"
        } else {
            "├─"
        };

        out.push('\n');
        out.push_str(tab);
        out.push_str(branch);
        if !rendered.is_empty() {
            out.push(' ');
            out.push_str(&rendered);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::{print_tree, PrintChild};

    #[test]
    fn renders_nested_branches() {
        let leaf = |_: &str| "leaf".to_string();
        let inner = |tab: &str| {
            let children: [Option<&PrintChild>; 1] = [Some(&leaf)];
            format!("inner{}", print_tree(tab, &children))
        };
        let children: [Option<&PrintChild>; 2] = [Some(&inner), Some(&leaf)];
        assert_eq!(
            print_tree("", &children),
            "\n├─ inner\n│  └─ leaf\n└─ leaf"
        );
    }

    #[test]
    fn empty_children_render_nothing() {
        let children: [Option<&PrintChild>; 2] = [None, None];
        assert_eq!(print_tree("", &children), "");
    }
}
