//! # Sample Dataset
//!
//! A small regulatory map used by `regmap init`, the benches and the tests:
//! two frameworks (PDPL and the payments law), three controls, five
//! articles, two provisions and ten edges.

use crate::formats::{
    ArticleRecord, ControlRecord, FrameworkRecord, GraphSnapshot, NodeRecord, ProvisionRecord,
};
use crate::{
    ArticleDetail, ControlDetail, Edge, FrameworkDetail, LayerDetail, Priority, ProvisionDetail,
    Relation,
};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| (*s).to_string()).collect()
}

struct Common<'a> {
    description: &'a str,
    regulator: &'a str,
    sector: &'a str,
}

fn stamp<D: LayerDetail>(mut record: NodeRecord<D>, common: &Common<'_>) -> NodeRecord<D> {
    record.kind = Some(D::KIND);
    record.version = Some("1.0.0".to_string());
    record.description = Some(common.description.to_string());
    record.regulator = Some(common.regulator.to_string());
    record.sector = Some(common.sector.to_string());
    record
}

fn framework(id: &str, name: &str, common: &Common<'_>, detail: FrameworkDetail) -> FrameworkRecord {
    stamp(FrameworkRecord::new(id, name, detail), common)
}

fn control(id: &str, name: &str, common: &Common<'_>, category: &str, guidance: &str) -> ControlRecord {
    let detail = ControlDetail {
        priority: Some(Priority::High),
        category: Some(category.to_string()),
        implementation_guidance: Some(guidance.to_string()),
    };
    stamp(ControlRecord::new(id, name, detail), common)
}

fn article(
    id: &str,
    name: &str,
    common: &Common<'_>,
    article_no: &str,
    legal_text: &str,
    references: &[&str],
) -> ArticleRecord {
    let detail = ArticleDetail {
        article_no: Some(article_no.to_string()),
        legal_text: Some(legal_text.to_string()),
        references: strings(references),
    };
    stamp(ArticleRecord::new(id, name, detail), common)
}

fn provision(id: &str, name: &str, common: &Common<'_>, detail: ProvisionDetail) -> ProvisionRecord {
    stamp(ProvisionRecord::new(id, name, detail), common)
}

/// The sample snapshot.
#[must_use]
pub fn sample_snapshot() -> GraphSnapshot {
    let pdpl = |description| Common {
        description,
        regulator: "سدايا",
        sector: "عام",
    };
    let pay = |description| Common {
        description,
        regulator: "ساما",
        sector: "مدفوعات",
    };

    let frameworks = vec![
        framework(
            "fw-pdpl",
            "نظام حماية البيانات الشخصية (PDPL)",
            &pdpl("إطار حماية البيانات"),
            FrameworkDetail {
                effective_date: Some("2022-09-01".to_string()),
                jurisdiction: Some("المملكة العربية السعودية".to_string()),
                external_url: Some("https://sdaia.gov.sa/ar/SDAIA/about/Documents/PDPL.pdf".to_string()),
                tags: strings(&["حماية البيانات", "الخصوصية", "GDPR"]),
            },
        ),
        framework(
            "fw-pay",
            "نظام المدفوعات وخدماتها",
            &Common {
                description: "تنظيم مزودي خدمات المدفوعات",
                regulator: "البنك المركزي السعودي",
                sector: "مدفوعات",
            },
            FrameworkDetail {
                effective_date: Some("2022-08-16".to_string()),
                jurisdiction: Some("المملكة العربية السعودية".to_string()),
                external_url: Some("https://laws.boe.gov.sa/BoeLaws/Laws/LawDetails/".to_string()),
                tags: strings(&["مدفوعات", "خدمات مالية", "ساما"]),
            },
        ),
    ];

    let controls = vec![
        control(
            "ctl-consent",
            "إدارة الموافقات",
            &pdpl("الحصول على موافقات صريحة وقابلة للإثبات"),
            "حماية البيانات",
            "يجب الحصول على موافقة صريحة من صاحب البيانات قبل معالجة بياناته الشخصية، مع توثيق الموافقة وإمكانية سحبها في أي وقت.",
        ),
        control(
            "ctl-retention",
            "سياسات الاحتفاظ",
            &pdpl("تقييد مدد الاحتفاظ بالبيانات"),
            "حماية البيانات",
            "يجب تحديد مدة الاحتفاظ بالبيانات الشخصية بناءً على الغرض من المعالجة، وحذف البيانات عند انتهاء الحاجة إليها.",
        ),
        control(
            "ctl-safeguard",
            "حماية أموال العملاء",
            &pay("فصل أموال العملاء وحمايتها"),
            "الحماية المالية",
            "يجب فصل أموال العملاء عن الأموال التشغيلية للشركة، وحفظها في حسابات منفصلة لدى بنوك مرخصة.",
        ),
    ];

    let articles = vec![
        article(
            "art-pdpl-1",
            "الشرعية والشفافية",
            &pdpl("معالجة مشروعة وشفافة"),
            "م 3",
            "يجب أن تكون معالجة البيانات الشخصية مشروعة وعادلة وشفافة بالنسبة لصاحب البيانات.",
            &["PDPL المادة 3", "اللائحة التنفيذية الفصل الثاني"],
        ),
        article(
            "art-pdpl-2",
            "تقييد الاحتفاظ",
            &pdpl("عدم الاحتفاظ أطول من اللازم"),
            "م 12",
            "لا يجوز الاحتفاظ بالبيانات الشخصية لمدة أطول من اللازم لتحقيق الأغراض التي جُمعت من أجلها.",
            &["PDPL المادة 12", "اللائحة التنفيذية الفصل الرابع"],
        ),
        article(
            "art-pdpl-3",
            "حقوق الوصول",
            &pdpl("حق الاطلاع والتصحيح"),
            "م 8",
            "لصاحب البيانات الحق في الوصول إلى بياناته الشخصية والحصول على نسخة منها، وطلب تصحيحها أو حذفها.",
            &["PDPL المادة 8", "اللائحة التنفيذية الفصل الثالث"],
        ),
        article(
            "art-pay-1",
            "حماية أموال العملاء",
            &pay("حسابات منفصلة"),
            "م 15",
            "يجب على مزود خدمة الدفع الاحتفاظ بأموال العملاء في حسابات منفصلة عن حساباته الخاصة.",
            &["نظام المدفوعات المادة 15", "التعليمات الرقابية 2024"],
        ),
        article(
            "art-pay-2",
            "الإفصاح والشفافية",
            &pay("إفصاح كامل عن الرسوم"),
            "م 17",
            "يجب على مزود خدمة الدفع الإفصاح بشكل واضح وشفاف عن جميع الرسوم والعمولات المرتبطة بالخدمة.",
            &["نظام المدفوعات المادة 17", "دليل الإفصاح 2023"],
        ),
    ];

    let provisions = vec![
        provision(
            "prov-001",
            "حكم: تقييد الاحتفاظ",
            &pdpl("تأكيد مبدأ التقييد زمنياً"),
            ProvisionDetail {
                citation: Some("س.إ.ع 1445".to_string()),
                court: Some("اللجنة الاستئنافية لحماية البيانات".to_string()),
                date: Some("2024-03-15".to_string()),
                summary: Some(
                    "أكدت اللجنة أن الاحتفاظ بالبيانات لأغراض تسويقية بعد انتهاء العلاقة التعاقدية يعد مخالفاً للمادة 12 من نظام حماية البيانات الشخصية."
                        .to_string(),
                ),
            },
        ),
        provision(
            "prov-002",
            "مبدأ: فصل أموال العملاء",
            &pay("تأكيد الفصل وعدم الاستخدام التشغيلي"),
            ProvisionDetail {
                citation: Some("تعليمات رقابية 2024".to_string()),
                court: Some("البنك المركزي السعودي".to_string()),
                date: Some("2024-01-10".to_string()),
                summary: Some(
                    "أصدر البنك المركزي تعليمات رقابية تؤكد على ضرورة فصل أموال العملاء بشكل كامل، وعدم استخدامها في العمليات التشغيلية للشركة تحت أي ظرف."
                        .to_string(),
                ),
            },
        ),
    ];

    let edges = vec![
        // framework -> control
        Edge::link("fw-pdpl", "ctl-consent", Relation::Interprets),
        Edge::link("fw-pdpl", "ctl-retention", Relation::Interprets),
        Edge::link("fw-pay", "ctl-safeguard", Relation::Interprets),
        // control -> article
        Edge::link("ctl-consent", "art-pdpl-1", Relation::BasedOn),
        Edge::link("ctl-consent", "art-pdpl-3", Relation::BasedOn),
        Edge::link("ctl-retention", "art-pdpl-2", Relation::BasedOn),
        Edge::link("ctl-safeguard", "art-pay-1", Relation::BasedOn),
        Edge::link("ctl-safeguard", "art-pay-2", Relation::RefersTo),
        // article -> provision
        Edge::link("art-pdpl-2", "prov-001", Relation::Restricts),
        Edge::link("art-pay-1", "prov-002", Relation::BasedOn),
    ];

    GraphSnapshot {
        frameworks,
        controls,
        articles,
        provisions,
        edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestor::Ingestor;

    #[test]
    fn sample_is_valid() {
        let snapshot = sample_snapshot();
        assert_eq!(snapshot.node_count(), 12);
        assert_eq!(snapshot.edges.len(), 10);
        assert!(Ingestor::validate_snapshot(&snapshot).is_ok());
    }
}
