//! Food Scoring - Decide whether a classified dish is healthy
//!
//! Labels are matched case-insensitively against keyword lists; a dish is
//! healthy only when it matches more healthy keywords than unhealthy ones.

use crate::domain::entities::FoodAnalysis;

/// How many labels are kept on the analysis
pub const MAX_LABELS: usize = 5;

const HEALTHY_KEYWORDS: &[&str] = &[
    "vegetable", "fruit", "salad", "fish", "lean", "grilled", "steamed",
    "apple", "asparagus", "avocado", "banana", "bean", "berry", "broccoli",
    "cabbage", "carrot", "cauliflower", "celery", "chickpea", "cucumber",
    "edamame", "egg", "grape", "kale", "kiwi", "lentil", "lettuce", "mango",
    "melon", "mushroom", "oat", "orange", "pear", "pea", "pepper",
    "pineapple", "quinoa", "radish", "rice", "salmon", "sashimi", "seaweed",
    "spinach", "sprout", "squash", "tofu", "tomato", "tuna", "yam", "yogurt",
    "zucchini",
];

const UNHEALTHY_KEYWORDS: &[&str] = &[
    "fried", "candy", "chocolate", "ice cream", "burger", "pizza", "soda",
    "chips", "cake", "processed", "bacon", "bagel", "baklava", "beignet",
    "biscuit", "bonbon", "brownie", "butter", "cheesecake", "churro",
    "cookie", "cupcake", "donut", "doughnut", "fries", "hot dog", "lasagna",
    "macaron", "muffin", "nacho", "pastry", "pie", "poutine", "pudding",
    "sausage", "tart", "tiramisu", "waffle", "whipped cream",
];

/// Keyword based health scorer
#[derive(Debug, Clone)]
pub struct HealthScorer {
    healthy: Vec<String>,
    unhealthy: Vec<String>,
}

impl Default for HealthScorer {
    fn default() -> Self {
        Self::new(HEALTHY_KEYWORDS, UNHEALTHY_KEYWORDS)
    }
}

impl HealthScorer {
    pub fn new(healthy: &[&str], unhealthy: &[&str]) -> Self {
        Self {
            healthy: healthy.iter().map(|k| k.to_lowercase()).collect(),
            unhealthy: unhealthy.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// (healthy, unhealthy) label counts
    pub fn score<S: AsRef<str>>(&self, labels: &[S]) -> (usize, usize) {
        labels.iter().fold((0, 0), |(healthy, unhealthy), label| {
            let label = label.as_ref().to_lowercase();
            let hit = |keywords: &[String]| keywords.iter().any(|k| label.contains(k.as_str()));
            (
                healthy + hit(&self.healthy[..]) as usize,
                unhealthy + hit(&self.unhealthy[..]) as usize,
            )
        })
    }

    pub fn is_healthy<S: AsRef<str>>(&self, labels: &[S]) -> bool {
        let (healthy, unhealthy) = self.score(labels);
        healthy > unhealthy
    }

    /// Build an analysis from ranked labels; scoring uses every label
    pub fn analyze(&self, mut labels: Vec<String>, confidence: f32) -> FoodAnalysis {
        let is_healthy = self.is_healthy(labels.as_slice());
        labels.truncate(MAX_LABELS);
        FoodAnalysis {
            is_healthy,
            labels,
            confidence,
        }
    }
}
