//! Built-in questionnaire: cholera screening.
//!
//! Symptom questions come first; once the main symptoms are confirmed, exposure
//! to risk factors decides how likely severe cholera is.

use crate::domain::{DecisionGraph, Node};

pub const ROOT: &str = "start";
pub const GROUP_SYMPTOMS: &str = "symptoms";
pub const GROUP_RISK: &str = "risk";

pub fn cholera_screening() -> DecisionGraph {
    let nodes = vec![
        Node::question(
            ROOT,
            "Does the patient have profuse watery diarrhea ('rice-water' stools)?",
            GROUP_SYMPTOMS,
            "q1",
            "c0",
        ),
        Node::conclusion(
            "c0",
            "Without massive watery diarrhea, typical cholera is ruled out. Consider other causes of acute diarrhea.",
            GROUP_SYMPTOMS,
        ),
        Node::question(
            "q1",
            "Is there intense vomiting?",
            GROUP_SYMPTOMS,
            "q2",
            "c1",
        ),
        Node::conclusion(
            "c1",
            "The lack of intense vomiting suggests another cause of the diarrhea, such as viral gastroenteritis or food poisoning.",
            GROUP_SYMPTOMS,
        ),
        Node::question(
            "q2",
            "Are there signs of severe dehydration (intense thirst, sunken eyes, reduced skin elasticity)?",
            GROUP_SYMPTOMS,
            "q3",
            "c2",
        ),
        Node::conclusion(
            "c2",
            "No severe dehydration indicates a mild case. Oral rehydration and follow-up are recommended.",
            GROUP_SYMPTOMS,
        ),
        Node::question(
            "q3",
            "Are there muscle cramps in the legs or abdomen?",
            GROUP_SYMPTOMS,
            "q4",
            "c3",
        ),
        Node::conclusion(
            "c3",
            "The absence of muscle cramps may indicate a less severe form, but the patient's progress must be monitored.",
            GROUP_SYMPTOMS,
        ),
        Node::question(
            "q4",
            "Has the patient recently consumed water or food under poor sanitary conditions?",
            GROUP_RISK,
            "c4",
            "c5",
        ),
        Node::conclusion(
            "c4",
            "Diagnosis: possible severe cholera. Immediate rehydration, urgent medical evaluation and antibiotic treatment are recommended.",
            GROUP_RISK,
        ),
        Node::conclusion(
            "c5",
            "Although the symptoms are compatible with cholera, the lack of exposure to risk factors lowers the probability. A medical evaluation is needed to rule out other causes.",
            GROUP_RISK,
        ),
    ];

    DecisionGraph::from_unique(ROOT, nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NodeKind;

    #[test]
    fn given_builtin_graph_when_validating_then_no_issues() {
        let graph = cholera_screening();
        assert_eq!(graph.validate(), vec![]);
        assert_eq!(graph.len(), 11);
    }

    #[test]
    fn given_builtin_nodes_when_building_then_no_id_is_shadowed() {
        let graph = cholera_screening();
        let ids: Vec<&str> = graph.nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["c0", "c1", "c2", "c3", "c4", "c5", "q1", "q2", "q3", "q4", "start"]
        );
    }

    #[test]
    fn given_builtin_graph_when_counting_conclusions_then_six() {
        let graph = cholera_screening();
        let conclusions = graph
            .nodes()
            .filter(|n| n.kind == NodeKind::Conclusion)
            .count();
        assert_eq!(conclusions, 6);
    }
}
