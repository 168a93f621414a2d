// Candidate name generation and the plain-text lists that feed it

use cloudhunt_scanner::dns::parse_resolver;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

/// `[base]` followed by six combinations per affix, in affix order:
/// `base-affix`, `base.affix`, `baseaffix`, `affix-base`, `affix.base`, `affixbase`.
pub fn generate_permutations(base: &str, affixes: &[String]) -> Vec<String> {
    let mut names = Vec::with_capacity(1 + affixes.len() * 6);
    names.push(base.to_string());

    for affix in affixes {
        names.push(format!("{}-{}", base, affix));
        names.push(format!("{}.{}", base, affix));
        names.push(format!("{}{}", base, affix));
        names.push(format!("{}-{}", affix, base));
        names.push(format!("{}.{}", affix, base));
        names.push(format!("{}{}", affix, base));
    }

    names
}

/// One affix per line; blank lines and `#` comments are skipped
pub fn parse_affixes(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

pub fn load_affixes(path: &Path) -> Result<Vec<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read permutations file {}: {}", path.display(), e))?;

    let affixes = parse_affixes(&content);
    if affixes.is_empty() {
        return Err(format!("No affixes found in {}", path.display()));
    }

    Ok(affixes)
}

/// One resolver per line, `ip` or `ip:port`; unparsable lines are skipped
pub fn parse_resolvers(content: &str) -> Vec<SocketAddr> {
    content.lines().filter_map(parse_resolver).collect()
}

pub fn load_resolvers(path: &Path) -> Result<Vec<SocketAddr>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read resolvers file {}: {}", path.display(), e))?;

    let resolvers = parse_resolvers(&content);
    if resolvers.is_empty() {
        return Err(format!("No valid resolvers found in {}", path.display()));
    }

    Ok(resolvers)
}
