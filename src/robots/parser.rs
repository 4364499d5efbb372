//! Robots.txt parsing
//!
//! Allow/disallow matching is delegated to the robotstxt crate. Crawl-delay
//! is not part of that crate's API, so it is read here from the same groups.

use robotstxt::DefaultMatcher;

/// Parsed robots.txt data for one origin
#[derive(Debug, Clone, Default)]
pub struct ParsedRobots {
    /// Raw content; None means allow everything
    content: Option<String>,
}

/// One `User-agent` group and the crawl delay it declares
#[derive(Debug)]
struct AgentGroup {
    agents: Vec<String>,
    crawl_delay: Option<f64>,
}

impl ParsedRobots {
    pub fn from_content(content: &str) -> Self {
        Self {
            content: Some(content.to_string()),
        }
    }

    /// Permissive robots used when robots.txt is missing or unreachable
    pub fn allow_all() -> Self {
        Self { content: None }
    }

    pub fn is_allow_all(&self) -> bool {
        self.content.as_deref().map_or(true, |c| c.trim().is_empty())
    }

    /// Checks if `url` may be fetched by the agent whose product token is `agent`
    pub fn is_allowed(&self, url: &str, agent: &str) -> bool {
        match self.content.as_deref() {
            None => true,
            Some(content) if content.trim().is_empty() => true,
            Some(content) => {
                let mut matcher = DefaultMatcher::default();
                matcher.one_agent_allowed_by_robots(content, agent, url)
            }
        }
    }

    /// Crawl delay in seconds for `agent`
    ///
    /// A group naming the agent wins over the `*` group.
    pub fn crawl_delay(&self, agent: &str) -> Option<f64> {
        let content = self.content.as_deref()?;
        let agent = agent.to_lowercase();
        let groups = parse_groups(content);

        let specific = groups
            .iter()
            .filter(|g| g.agents.iter().any(|a| a != "*" && agent.contains(a.as_str())))
            .find_map(|g| g.crawl_delay);

        specific.or_else(|| {
            groups
                .iter()
                .filter(|g| g.agents.iter().any(|a| a == "*"))
                .find_map(|g| g.crawl_delay)
        })
    }
}

/// Splits robots.txt into user-agent groups
///
/// Consecutive `User-agent` lines share a group; a `User-agent` line after
/// any other directive starts a new one.
fn parse_groups(content: &str) -> Vec<AgentGroup> {
    let mut groups: Vec<AgentGroup> = Vec::new();
    let mut in_agent_run = false;

    for line in content.lines() {
        let line = line.split('#').next().unwrap_or("").trim();
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_lowercase();
        let value = value.trim();

        match key.as_str() {
            "user-agent" => {
                if !in_agent_run || groups.is_empty() {
                    groups.push(AgentGroup {
                        agents: Vec::new(),
                        crawl_delay: None,
                    });
                }
                if let Some(group) = groups.last_mut() {
                    group.agents.push(value.to_lowercase());
                }
                in_agent_run = true;
            }
            "crawl-delay" => {
                in_agent_run = false;
                if let (Some(group), Ok(delay)) = (groups.last_mut(), value.parse::<f64>()) {
                    if delay.is_finite() && delay >= 0.0 {
                        group.crawl_delay = Some(delay);
                    }
                }
            }
            _ => in_agent_run = false,
        }
    }

    groups
}
