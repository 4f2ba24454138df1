//! Rules command implementation.

use console::style;

use qrew_opt::RuleSet;

fn describe(family: RuleSet) -> &'static str {
    match family {
        RuleSet::NULL_GATE => "removes adjacent identical self-inverse gates (h, x, y, z)",
        RuleSet::PEEPING_CONTROL => {
            "resolves guards whose qubit is in a known basis state"
        }
        RuleSet::H_SANDWICH_REDUCTION => "rewrites h x h as z and h z h as x",
        RuleSet::CONTROL_REVERSAL => "swaps control and target of a cx wrapped in h gates",
        _ => "",
    }
}

/// Execute the rules command.
pub fn execute() {
    println!("{}", style("Rule families:").bold());
    for (family, name) in RuleSet::FAMILIES {
        let depth = family
            .instantiate()
            .iter()
            .map(|entry| entry.depth)
            .max()
            .unwrap_or_default();
        println!(
            "  {:<18} depth {}  {}",
            style(name).cyan(),
            depth,
            describe(family)
        );
    }
    println!();
    println!(
        "Select with {} or {}.",
        style("--rules null-gate,h-sandwich").yellow(),
        style("--rules all").yellow()
    );
}
