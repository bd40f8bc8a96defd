use super::domain::{Domain, Question, WeightingCategory};
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("domain id {0} appears more than once")]
    DuplicateDomain(String),
    #[error("question id {0} appears more than once")]
    DuplicateQuestion(String),
}

/// Ordered set of assessment domains; display order is also traversal order.
#[derive(Debug, Clone, Serialize)]
pub struct DomainCatalog {
    domains: Vec<Domain>,
}

impl DomainCatalog {
    pub fn standard() -> Self {
        Self {
            domains: standard_domains(),
        }
    }

    /// Builds a custom catalog; domain and question ids must be unique across it.
    pub fn from_domains(domains: Vec<Domain>) -> Result<Self, CatalogError> {
        let mut domain_ids = HashSet::new();
        let mut question_ids = HashSet::new();
        for domain in &domains {
            if !domain_ids.insert(domain.id) {
                return Err(CatalogError::DuplicateDomain(domain.id.to_string()));
            }
            for question in &domain.questions {
                if !question_ids.insert(question.id) {
                    return Err(CatalogError::DuplicateQuestion(question.id.to_string()));
                }
            }
        }
        Ok(Self { domains })
    }

    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn last_index(&self) -> Option<usize> {
        self.domains.len().checked_sub(1)
    }

    pub fn domain(&self, index: usize) -> Option<&Domain> {
        self.domains.get(index)
    }

    pub fn domain_by_id(&self, domain_id: &str) -> Option<&Domain> {
        self.domains.iter().find(|domain| domain.id == domain_id)
    }

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.domains
            .iter()
            .find_map(|domain| domain.question(question_id))
    }

    pub fn domain_for_question(&self, question_id: &str) -> Option<&Domain> {
        self.domains
            .iter()
            .find(|domain| domain.question(question_id).is_some())
    }

    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.domains.iter().flat_map(|domain| domain.questions.iter())
    }
}

impl Default for DomainCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

const fn question(id: &'static str, text: &'static str, category: WeightingCategory) -> Question {
    Question { id, text, category }
}

fn standard_domains() -> Vec<Domain> {
    vec![
        Domain {
            id: "models-of-care",
            title: "Models of Care",
            description: Some("Assessment of care delivery models and their environmental impact"),
            questions: vec![
                question(
                    "moc-1",
                    "What will be the impact on reducing 'care miles' by making care closer to home / reducing need for face to face appointments (patient travel)?",
                    WeightingCategory::KeyMetric,
                ),
                question(
                    "moc-2",
                    "What will be the impact on reducing the need for staff to visit patients in their own home?",
                    WeightingCategory::KeyMetric,
                ),
                question(
                    "moc-3",
                    "What will be the impact on reducing hospital admissions or surgical care?",
                    WeightingCategory::KeyMetric,
                ),
                question(
                    "moc-4",
                    "What will be the impact on reducing unnecessary face to face appointments (e.g. first / follow up)?",
                    WeightingCategory::KeyMetric,
                ),
            ],
        },
        Domain {
            id: "travel",
            title: "Travel",
            description: Some("Impact assessment of travel and transportation"),
            questions: vec![
                question(
                    "travel-1",
                    "What will be the impact on vehicle mileage from staff travel (commuting, business travel)?",
                    WeightingCategory::KeyMetric,
                ),
                question(
                    "travel-2",
                    "What will be the impact on mileage from Facilities Management, Contractor and/or Supply Chain?",
                    WeightingCategory::Standard,
                ),
                question(
                    "travel-3",
                    "What will be the impact on green travel / alternatives to fossil fuel car/air transport (e.g. public transport, car sharing, walking, cycling, sustainable shipping)?",
                    WeightingCategory::KeyMetric,
                ),
                question(
                    "travel-4",
                    "What will be the impact on supporting more efficient use of environmentally friendly fuels and technologies?",
                    WeightingCategory::Standard,
                ),
            ],
        },
        Domain {
            id: "consumables",
            title: "Consumables",
            description: Some("Assessment of consumable usage and waste reduction"),
            questions: vec![
                question(
                    "cons-1",
                    "What will be the impact on reducing single use items (e.g. Equipment / plastics)?",
                    WeightingCategory::Standard,
                ),
                question(
                    "cons-2",
                    "What will be the impact on reducing use of natural resources and promoting a circular economy?",
                    WeightingCategory::Standard,
                ),
                question(
                    "cons-3",
                    "What will be the impact on decreasing use of unnecessary/carbon intensive anaesthetic gases, pharmaceuticals or medical devices?",
                    WeightingCategory::KeyMetric,
                ),
                question(
                    "cons-4",
                    "What will be the impact on improving the supply chain e.g. more efficient delivery / improved storage and distribution?",
                    WeightingCategory::Standard,
                ),
            ],
        },
        Domain {
            id: "it-digital",
            title: "IT / Digital",
            description: Some("Assessment of IT and digital solutions impact"),
            questions: vec![
                question(
                    "it-1",
                    "What will be the impact on using Green IT e.g. green cloud servers / refurbished equipment / sustainable asset disposal?",
                    WeightingCategory::Standard,
                ),
                question(
                    "it-2",
                    "What will be the impact of using digital solutions to replace the need for resource use / travel?",
                    WeightingCategory::Standard,
                ),
            ],
        },
        Domain {
            id: "resource-use",
            title: "Resource Use",
            description: Some("Assessment of resource utilization and sustainability"),
            questions: vec![
                question(
                    "res-1",
                    "What will be the impact on reducing waste production or increasing waste recycling?",
                    WeightingCategory::KeyMetricUn,
                ),
                question(
                    "res-2",
                    "What will be the impact on reducing single use plastic packaging?",
                    WeightingCategory::KeyMetricUn,
                ),
                question(
                    "res-3",
                    "What will be the impact on reducing environmental hazards/pollution and/or toxic materials?",
                    WeightingCategory::UnGoals,
                ),
                question(
                    "res-4",
                    "What will be the impact on improving use of renewable energy?",
                    WeightingCategory::UnGoals,
                ),
                question(
                    "res-5",
                    "What will be the impact on decreasing usage of utilities (e.g. electricity, gas, oil, water, sewerage, etc.)?",
                    WeightingCategory::KeyMetricUn,
                ),
            ],
        },
        Domain {
            id: "workforce",
            title: "Workforce",
            description: Some("Assessment of workforce impact and efficiency"),
            questions: vec![
                question(
                    "work-1",
                    "What will be the impact on Net Zero/Climate change skills and competencies and/or Leadership (increasing awareness on climate change)?",
                    WeightingCategory::UnGoals,
                ),
                question(
                    "work-2",
                    "What will be the impact on staff efficiency / effectiveness (including home working)?",
                    WeightingCategory::Standard,
                ),
            ],
        },
        Domain {
            id: "adaptation",
            title: "Adaptation to Climate Change",
            description: Some("Assessment of climate change adaptation measures"),
            questions: vec![
                question(
                    "adapt-1",
                    "What will be the impact on improving green space and access to green space?",
                    WeightingCategory::UnGoals,
                ),
                question(
                    "adapt-2",
                    "What will be the impact on preventing risks to business continuity during extreme weather (failed infrastructure e.g. transport, buildings, IT, utilities) or failures to Supply Chain?",
                    WeightingCategory::Standard,
                ),
                question(
                    "adapt-3",
                    "What will be the impact on preventing risks to business continuity due to resource availability (e.g. pharmaceutical products, medical devices, fuel shortages)?",
                    WeightingCategory::Standard,
                ),
                question(
                    "adapt-4",
                    "What will be the impact on preventing risks to business continuity due to lack of staff (e.g. critical staffing levels)?",
                    WeightingCategory::Standard,
                ),
                question(
                    "adapt-5",
                    "What will be the impact on supporting mitigation of the likely effects of climate change (e.g. identifying proactive and community support for vulnerable groups; contingency planning for flood, heatwave and other weather extremes)?",
                    WeightingCategory::UnGoals,
                ),
            ],
        },
        Domain {
            id: "social-value",
            title: "Social Value",
            description: Some("Assessment of social impact and community benefits"),
            questions: vec![
                question(
                    "soc-1",
                    "What will be the impact on reducing inequalities in health and access to services?",
                    WeightingCategory::Standard,
                ),
                question(
                    "soc-2",
                    "What will be the impact on improving Air Quality?",
                    WeightingCategory::UnGoals,
                ),
                question(
                    "soc-3",
                    "What will be the impact on offering employment opportunities to disadvantaged groups / paying above living wage and/or offering opportunities and skills to local people?",
                    WeightingCategory::Standard,
                ),
                question(
                    "soc-4",
                    "What will be the impact on promoting well-being / mental health / healthy working lives (e.g. work-life/home-life balance, family friendly policies)?",
                    WeightingCategory::Standard,
                ),
                question(
                    "soc-5",
                    "What will be the impact on supporting the local economy through local suppliers, SMEs or engaging with third sector or community groups?",
                    WeightingCategory::Standard,
                ),
                question(
                    "soc-6",
                    "What will be the impact on promoting ethical purchasing of goods or services e.g. increasing transparency of modern slavery in the supply chain globally?",
                    WeightingCategory::Standard,
                ),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn question_ids_are_unique_across_domains() {
        let catalog = DomainCatalog::standard();
        let mut seen = HashSet::new();
        for question in catalog.questions() {
            assert!(seen.insert(question.id), "duplicate id {}", question.id);
        }
        assert_eq!(seen.len(), 32);
    }

    #[test]
    fn domain_ids_are_unique_and_ordered() {
        let catalog = DomainCatalog::standard();
        let ids: Vec<&str> = catalog.domains().iter().map(|domain| domain.id).collect();
        assert_eq!(
            ids,
            vec![
                "models-of-care",
                "travel",
                "consumables",
                "it-digital",
                "resource-use",
                "workforce",
                "adaptation",
                "social-value",
            ]
        );
        assert_eq!(catalog.last_index(), Some(7));
    }

    #[test]
    fn lookups_resolve_questions_to_their_domain() {
        let catalog = DomainCatalog::standard();
        let domain = catalog
            .domain_for_question("res-4")
            .expect("resource question present");
        assert_eq!(domain.title, "Resource Use");
        assert_eq!(
            catalog.question("res-4").map(|question| question.category),
            Some(WeightingCategory::UnGoals)
        );
        assert!(catalog.question("res-99").is_none());
        assert!(catalog.domain_by_id("nope").is_none());
    }

    #[test]
    fn standard_questions_carry_no_badge() {
        let catalog = DomainCatalog::standard();
        let badges: HashSet<Option<&str>> = catalog
            .questions()
            .map(|question| question.category.badge())
            .collect();
        assert!(badges.contains(&None));
        assert!(badges.contains(&Some("Key Metric & UN Goals")));
    }

    #[test]
    fn custom_catalog_rejects_duplicate_ids() {
        let standard = DomainCatalog::standard();
        let travel = standard.domain_by_id("travel").expect("travel").clone();

        let err = DomainCatalog::from_domains(vec![travel.clone(), travel.clone()])
            .expect_err("duplicate domain");
        assert_eq!(err, CatalogError::DuplicateDomain("travel".to_string()));

        let mut copy = travel.clone();
        copy.id = "travel-copy";
        let err = DomainCatalog::from_domains(vec![travel, copy]).expect_err("duplicate question");
        assert_eq!(err, CatalogError::DuplicateQuestion("travel-1".to_string()));
    }

    #[test]
    fn empty_custom_catalog_is_allowed() {
        let catalog = DomainCatalog::from_domains(Vec::new()).expect("empty catalog");
        assert!(catalog.is_empty());
        assert_eq!(catalog.last_index(), None);
    }
}
