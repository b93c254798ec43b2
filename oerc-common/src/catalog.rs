//! Fixed site content
//!
//! The demonstration papers (shown when the backend is unreachable), the
//! catalog behind the mock query service, and the static event, conference
//! and FAQ listings. Demo papers and catalog entries share the same seed
//! records and differ only by identifier prefix.

use chrono::NaiveDate;

use crate::models::{Event, FaqEntry, Paper};

/// Identifier prefix of the offline demo set
pub const DEMO_ID_PREFIX: &str = "demo";

/// Identifier prefix of the query-service catalog
pub const CATALOG_ID_PREFIX: &str = "paper";

struct Seed {
    title: &'static str,
    author: &'static str,
    date: (i32, u32, u32),
    abstract_text: &'static str,
    tags: &'static [&'static str],
    image_seed: &'static str,
}

const SEEDS: &[Seed] = &[
    Seed {
        title: "The Impact of Digital Learning Tools on Student Engagement in Ontario Classrooms",
        author: "Dr. Sarah Chen",
        date: (2024, 3, 15),
        abstract_text: "This study examines how digital learning tools affect student engagement across 50 Ontario elementary schools. Our findings indicate a 23% increase in active participation when interactive technologies are integrated thoughtfully into lesson plans.",
        tags: &["Technology", "Engagement", "Elementary Education"],
        image_seed: "edu1",
    },
    Seed {
        title: "Addressing Learning Gaps: Evidence-Based Interventions for Post-Pandemic Recovery",
        author: "Prof. Michael Torres",
        date: (2024, 2, 28),
        abstract_text: "Following the COVID-19 pandemic, many students experienced significant learning gaps. This paper reviews 15 evidence-based intervention strategies and their effectiveness in Ontario secondary schools.",
        tags: &["Learning Recovery", "Interventions", "Secondary Education"],
        image_seed: "edu2",
    },
    Seed {
        title: "Culturally Responsive Teaching Practices in Diverse Urban Classrooms",
        author: "Dr. Amira Hassan",
        date: (2024, 1, 20),
        abstract_text: "This qualitative study explores how educators in diverse urban settings implement culturally responsive teaching practices. Findings highlight key strategies for improving educational equity and student belonging.",
        tags: &["Equity", "Diversity", "Urban Education"],
        image_seed: "edu3",
    },
    Seed {
        title: "AI-Assisted Assessment: Opportunities and Ethical Considerations",
        author: "Dr. James Liu",
        date: (2024, 4, 10),
        abstract_text: "As artificial intelligence becomes more prevalent in educational settings, this paper examines both the potential benefits of AI-assisted assessment and the ethical considerations educators must address.",
        tags: &["AI in Education", "Assessment", "Ethics"],
        image_seed: "edu4",
    },
    Seed {
        title: "Early Literacy Interventions: A Meta-Analysis of Phonics-Based Programs",
        author: "Dr. Emily Watson",
        date: (2024, 3, 1),
        abstract_text: "This meta-analysis reviews 42 studies on phonics-based literacy interventions for early readers. Results support structured literacy approaches with significant effect sizes for struggling readers.",
        tags: &["Literacy", "Early Childhood", "Phonics"],
        image_seed: "edu5",
    },
    Seed {
        title: "Teacher Well-being and Retention: Building Sustainable Education Systems",
        author: "Prof. David Kim",
        date: (2024, 2, 15),
        abstract_text: "Examining factors contributing to teacher burnout and retention, this study provides actionable recommendations for school administrators to support educator well-being and reduce turnover.",
        tags: &["Teacher Wellness", "Retention", "Policy"],
        image_seed: "edu6",
    },
];

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn seeded_papers(prefix: &str) -> Vec<Paper> {
    SEEDS
        .iter()
        .enumerate()
        .map(|(i, seed)| Paper {
            id: format!("{}-{}", prefix, i + 1),
            title: seed.title.to_string(),
            author: seed.author.to_string(),
            date: ymd(seed.date.0, seed.date.1, seed.date.2),
            abstract_text: seed.abstract_text.to_string(),
            tags: seed.tags.iter().map(|t| t.to_string()).collect(),
            image_url: Some(format!("https://picsum.photos/seed/{}/800/400", seed.image_seed)),
            pdf_url: None,
        })
        .collect()
}

/// Papers shown when the backend is unreachable, unconfigured or empty
pub fn demo_papers() -> Vec<Paper> {
    seeded_papers(DEMO_ID_PREFIX)
}

/// Catalog searched by the mock query service
pub fn query_catalog() -> Vec<Paper> {
    seeded_papers(CATALOG_ID_PREFIX)
}

/// Consortium-hosted events
pub fn consortium_events() -> Vec<Event> {
    vec![
        Event {
            id: "1",
            title: "Annual OERC Research Symposium",
            date: ymd(2024, 6, 15),
            location: "St. Catharines Conference Centre",
            description: "Join over 500 educators and researchers for our flagship event showcasing the latest findings in educational science.",
            link: None,
        },
        Event {
            id: "2",
            title: "Workshop: Data Visualization for Educators",
            date: ymd(2024, 7, 10),
            location: "Virtual (Zoom)",
            description: "A hands-on workshop learning how to interpret and present classroom data effectively using modern tools.",
            link: None,
        },
    ]
}

/// External conferences the consortium recommends
pub fn global_conferences() -> Vec<Event> {
    vec![
        Event {
            id: "g1",
            title: "ISTE Live 24",
            date: ymd(2024, 6, 23),
            location: "Denver, USA and Virtual",
            description: "One of the world's most comprehensive edtech events, focusing on innovation in learning and teaching.",
            link: Some("https://www.iste.org/"),
        },
        Event {
            id: "g2",
            title: "ICERI 2024",
            date: ymd(2024, 11, 11),
            location: "Seville, Spain",
            description: "17th annual International Conference of Education, Research and Innovation.",
            link: Some("https://iated.org/iceri/"),
        },
        Event {
            id: "g3",
            title: "Bett UK 2025",
            date: ymd(2025, 1, 22),
            location: "London, UK",
            description: "The global community for education technology, connecting educators with solutions.",
            link: Some("https://www.bettshow.com/"),
        },
        Event {
            id: "g4",
            title: "WERA Focal Meeting",
            date: ymd(2024, 9, 8),
            location: "Manchester, UK",
            description: "World Education Research Association meeting addressing global challenges in education.",
            link: Some("https://weraonline.org/"),
        },
    ]
}

/// FAQ page entries, in display order
pub fn faq_entries() -> Vec<FaqEntry> {
    vec![
        FaqEntry {
            question: "What is the primary mission of the OERC?",
            answer: "The Ontario Educational Research Consortium (OERC) is dedicated to bridging the gap between academic educational research and classroom practice. We aggregate, synthesize, and disseminate high-quality research to empower educators and improve student outcomes across Ontario.",
        },
        FaqEntry {
            question: "How can I become a member of the OERC?",
            answer: "Membership is open to all educators, researchers, and educational institutions. You can apply through our 'Get Involved' page. We offer standard individual memberships as well as institutional packages.",
        },
        FaqEntry {
            question: "Is the research library accessible to everyone?",
            answer: "Yes, our core mission is open access. The majority of our research summaries and reports are available to the public for free. However, full access to certain datasets, detailed analytics, and some peer-reviewed journals is reserved for registered members.",
        },
        FaqEntry {
            question: "How does OERC select research papers for its library?",
            answer: "Our research committee reviews papers based on relevance to the Ontario curriculum, methodological rigor, and potential for practical application. We source from peer-reviewed journals, university repositories, and government reports.",
        },
        FaqEntry {
            question: "Can I submit my own research to the OERC?",
            answer: "Absolutely. We encourage submissions from local educators and researchers. Please contact our research coordination team at contact@oerc.org for submission guidelines and the peer review process.",
        },
        FaqEntry {
            question: "Do you offer professional development opportunities?",
            answer: "Yes, we host regular webinars, workshops, and an annual research symposium. These events are designed to help educators understand and apply research findings in their practice.",
        },
    ]
}
