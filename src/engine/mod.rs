// ==========================================
// 产品目录对齐系统 - 引擎层
// ==========================================
// 职责: 标识符提取 / 匹配 / 对齐表 / 本体填充 / 数据探查 / 流程编排
// 红线: 引擎只消费规范化记录，不读原始抓取字段
// ==========================================

pub mod alignment;
pub mod exploration;
pub mod identifier;
pub mod matcher;
pub mod ontology;
pub mod orchestrator;

// 重导出核心引擎
pub use alignment::{
    entity_iri, instance_name, merge_alignments, read_alignment, reduce_to_matches,
    save_alignment, write_alignment, EntityResolver,
};
pub use exploration::{
    attribute_overlap, check_duplicate_attributes, clock_rate_ranges, find_possible_classes,
    AttributeOverlap, AttributeSpread,
};
pub use identifier::IdentifierExtractor;
pub use matcher::{indel_similarity, similarity, MatchPair, MatchSet, Matcher};
pub use ontology::{
    DatatypeProperty, InMemoryOntology, InstanceTriple, OntologyInstance, OntologyPopulator,
    OntologySink, TaxonomyEntry,
};
pub use orchestrator::{AlignmentRun, PairAlignment, RunReport};
