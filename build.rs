use clap::ValueEnum;
use std::collections::HashMap;
use std::path::Path;

include!("src/cli.rs");

/// zsh case labels of subcommands with visible aliases, e.g. `(delete)` maps to `(del)`, `(era)`
fn alias_labels(cmd: &Command) -> HashMap<String,Vec<String>> {
    let mut ans = HashMap::new();
    for sub in cmd.get_subcommands() {
        let labels: Vec<String> = sub.get_visible_aliases().map(|a| format!("({})",a)).collect();
        if !labels.is_empty() {
            ans.insert(format!("({})",sub.get_name()),labels);
        }
    }
    ans
}

/// clap writes one case arm per subcommand under its primary name only.
/// Repeat each aliased arm under every alias, and let `--opt=` specs also complete `--opt value`.
fn refine_zsh(script: &str,aliases: &HashMap<String,Vec<String>>) -> Result<String,regex::Error> {
    let opt_patt = regex::RegexBuilder::new(r"^'--(\w+)=\[").multi_line(true).build()?;
    let label_patt = regex::Regex::new(r"^\(\w+\)$")?;
    let script = opt_patt.replace_all(script,"'--$1+[");
    let mut ans = String::new();
    // label and text of the arm being copied
    let mut arm: Option<(String,String)> = None;
    for line in script.lines() {
        arm = match arm.take() {
            Some((label,mut text)) => {
                text += line;
                text += "\n";
                if line != ";;" {
                    Some((label,text))
                } else {
                    ans += &text;
                    for alias in &aliases[&label] {
                        ans += &text.replace(&label,alias);
                    }
                    None
                }
            },
            None if label_patt.is_match(line) && aliases.contains_key(line) => {
                Some((line.to_string(),format!("{}\n",line)))
            },
            None => {
                ans += line;
                ans += "\n";
                None
            }
        };
    }
    Ok(ans)
}

fn main() -> Result<(),Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=src/cli.rs");
    if std::env::var("DOCS_RS").is_ok() {
        return Ok(());
    }
    let outdir = match std::env::var_os("CARGO_MANIFEST_DIR") {
        Some(root) => Path::new(&root).join("completions"),
        None => return Ok(())
    };
    std::fs::create_dir_all(&outdir)?;
    let mut cmd = build_cli();
    let aliases = alias_labels(&cmd);
    for shell in clap_complete::Shell::value_variants() {
        let path = clap_complete::generate_to(*shell,&mut cmd,"ti99kit",&outdir)?;
        if *shell == clap_complete::Shell::Zsh {
            let script = std::fs::read_to_string(&path)?;
            std::fs::write(&path,refine_zsh(&script,&aliases)?)?;
        }
    }
    Ok(())
}
