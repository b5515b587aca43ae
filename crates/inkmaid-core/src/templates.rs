//! Built-in example diagrams.

/// A named example diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub name: &'static str,
    pub source: &'static str,
}

impl Template {
    /// Lowercase, dash-separated name, e.g. `class-diagram`.
    pub fn slug(&self) -> String {
        self.name.to_lowercase().replace(' ', "-")
    }
}

/// Source shown when the editor first opens.
pub const DEFAULT_SOURCE: &str = "graph TD
    A[Start] --> B{Is it working?}
    B -->|Yes| C[Great!]
    B -->|No| D[Fix it]
    D --> B
    C --> E[End]";

pub const FLOWCHART: Template = Template {
    name: "Flowchart",
    source: "graph TD
    A[Start] --> B{Decision}
    B -->|Yes| C[Action 1]
    B -->|No| D[Action 2]
    C --> E[End]
    D --> E",
};

pub const SEQUENCE: Template = Template {
    name: "Sequence",
    source: "sequenceDiagram
    participant A as Alice
    participant B as Bob
    A->>B: Hello Bob
    B-->>A: Hello Alice
    A->>B: How are you?
    B-->>A: I'm good, thanks!",
};

pub const PIE_CHART: Template = Template {
    name: "Pie Chart",
    source: "pie title Project Time Distribution
    \"Development\" : 45
    \"Testing\" : 25
    \"Documentation\" : 15
    \"Meetings\" : 15",
};

pub const GANTT: Template = Template {
    name: "Gantt",
    source: "gantt
    title Project Timeline
    dateFormat  YYYY-MM-DD
    section Phase 1
    Task 1           :a1, 2024-01-01, 30d
    Task 2           :after a1, 20d
    section Phase 2
    Task 3           :2024-02-01, 25d
    Task 4           :20d",
};

pub const CLASS_DIAGRAM: Template = Template {
    name: "Class Diagram",
    source: "classDiagram
    class Animal {
        +String name
        +int age
        +makeSound()
    }
    class Dog {
        +String breed
        +bark()
    }
    Animal <|-- Dog",
};

/// All templates in menu order.
pub static TEMPLATES: [Template; 5] = [FLOWCHART, SEQUENCE, PIE_CHART, GANTT, CLASS_DIAGRAM];

/// Look a template up by display name or slug, ignoring case.
pub fn by_name(name: &str) -> Option<&'static Template> {
    let wanted = name.trim().to_lowercase().replace(['_', ' '], "-");
    TEMPLATES.iter().find(|t| t.slug() == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_templates_in_order() {
        let names: Vec<_> = TEMPLATES.iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            ["Flowchart", "Sequence", "Pie Chart", "Gantt", "Class Diagram"]
        );
    }

    #[test]
    fn test_templates_start_with_diagram_keyword() {
        let keywords = ["graph", "sequenceDiagram", "pie", "gantt", "classDiagram"];
        for (template, keyword) in TEMPLATES.iter().zip(keywords) {
            assert!(template.source.starts_with(keyword), "{}", template.name);
        }
        assert!(DEFAULT_SOURCE.starts_with("graph TD"));
    }

    #[test]
    fn test_by_name() {
        assert_eq!(by_name("Gantt"), Some(&GANTT));
        assert_eq!(by_name("pie chart"), Some(&PIE_CHART));
        assert_eq!(by_name("class-diagram"), Some(&CLASS_DIAGRAM));
        assert_eq!(by_name("CLASS_DIAGRAM"), Some(&CLASS_DIAGRAM));
        assert_eq!(by_name("mindmap"), None);
    }
}
