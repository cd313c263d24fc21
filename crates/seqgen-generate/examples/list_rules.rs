use seqgen_generate::RuleRegistry;

fn main() {
    for rule in RuleRegistry::global().rules() {
        println!("{:<24} {}", rule.id(), rule.description());
    }
}
