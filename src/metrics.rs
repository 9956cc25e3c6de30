use serde::Serialize;
use std::fmt;

/// The six repository metrics, in chart order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Metric {
    Stars,
    Forks,
    Issues,
    Watchers,
    PullRequests,
    Commits,
}

/// Which side of the thresholds a value falls on. Ordered low to high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Bucket {
    Low,
    Medium,
    High,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Stars,
        Metric::Forks,
        Metric::Issues,
        Metric::Watchers,
        Metric::PullRequests,
        Metric::Commits,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Metric::Stars => "Stars",
            Metric::Forks => "Forks",
            Metric::Issues => "Issues",
            Metric::Watchers => "Watchers",
            Metric::PullRequests => "Pull Requests",
            Metric::Commits => "Commits",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }

    /// The `(low, medium)` breakpoints for this metric.
    pub fn thresholds(self) -> (u64, u64) {
        match self {
            Metric::Stars => (50, 200),
            Metric::Forks => (20, 100),
            Metric::Issues => (10, 50),
            Metric::Watchers => (10, 50),
            Metric::PullRequests => (5, 20),
            Metric::Commits => (50, 200),
        }
    }

    /// Labels for the low, medium and high buckets.
    pub fn labels(self) -> [&'static str; 3] {
        match self {
            Metric::Stars => ["Rising Star", "Popular", "Star Struck!"],
            Metric::Forks => ["Just Started", "Fork-tastic", "Fork Legend"],
            Metric::Issues => ["Few Issues", "Some Issues", "Issue Magnet"],
            Metric::Watchers => ["Some Watchers", "Watching Closely", "Highly Watched"],
            Metric::PullRequests => ["Few PRs", "Active PRs", "24x7 Puller"],
            Metric::Commits => ["Few Commits", "Regular Commits", "Commit King"],
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Places `value` into a bucket: below `low`, in `[low, medium)`, or at/above `medium`.
pub fn bucket(metric: Metric, value: u64) -> Bucket {
    let (low, medium) = metric.thresholds();
    if value < low {
        Bucket::Low
    } else if value < medium {
        Bucket::Medium
    } else {
        Bucket::High
    }
}

/// Returns the qualitative label for a metric value.
pub fn classify(metric: Metric, value: u64) -> &'static str {
    let labels = metric.labels();
    match bucket(metric, value) {
        Bucket::Low => labels[0],
        Bucket::Medium => labels[1],
        Bucket::High => labels[2],
    }
}

/// Same as [`classify`], looking the metric up by its display name.
pub fn classify_by_name(name: &str, value: u64) -> Option<&'static str> {
    Metric::from_name(name).map(|metric| classify(metric, value))
}

/// The numbers fetched for one repository.
///
/// `pull_requests` and `commits` are the item counts of the first page GitHub
/// returns, not repository totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricSet {
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
    pub watchers: u64,
    pub pull_requests: u64,
    pub commits: u64,
}

impl MetricSet {
    pub fn get(&self, metric: Metric) -> u64 {
        match metric {
            Metric::Stars => self.stars,
            Metric::Forks => self.forks,
            Metric::Issues => self.open_issues,
            Metric::Watchers => self.watchers,
            Metric::PullRequests => self.pull_requests,
            Metric::Commits => self.commits,
        }
    }

    /// `(metric, value)` pairs in chart order.
    pub fn iter(&self) -> impl Iterator<Item = (Metric, u64)> + '_ {
        Metric::ALL.into_iter().map(move |m| (m, self.get(m)))
    }
}
