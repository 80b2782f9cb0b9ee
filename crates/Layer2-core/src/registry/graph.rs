//! Dependency Graph - 타입 간 의존성 그래프
//!
//! 타입 이름 -> 의존 타입 이름 집합. 무효화 전파를 위해 역방향 인덱스를 함께
//! 유지합니다.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

/// 결정적 순서의 그래프 스냅샷
pub type GraphSnapshot = BTreeMap<String, BTreeSet<String>>;

/// 의존성 그래프
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// 노드 (분석된 타입)
    nodes: HashSet<String>,
    /// 엣지 (from -> to)
    edges: HashMap<String, HashSet<String>>,
    /// 역방향 엣지 (to -> from)
    reverse_edges: HashMap<String, HashSet<String>>,
}

impl DependencyGraph {
    /// 새 그래프 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 노드 추가
    pub fn add_node(&mut self, name: impl Into<String>) {
        self.nodes.insert(name.into());
    }

    /// 엣지 추가 (self edge 무시)
    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) {
        let from = from.into();
        let to = to.into();
        if from == to {
            return;
        }
        self.nodes.insert(from.clone());
        self.edges.entry(from.clone()).or_default().insert(to.clone());
        self.reverse_edges.entry(to).or_default().insert(from);
    }

    /// 노드와 나가는 엣지 제거 (재발견 시 다시 구성됨)
    ///
    /// 이 노드를 가리키는 다른 타입의 엣지는 유지됩니다.
    pub fn remove_node(&mut self, name: &str) -> bool {
        let had_node = self.nodes.remove(name);
        let had_edges = self.clear_outgoing(name);
        had_node || had_edges
    }

    /// 나가는 엣지만 제거
    pub fn clear_outgoing(&mut self, name: &str) -> bool {
        let Some(targets) = self.edges.remove(name) else {
            return false;
        };
        for target in targets {
            if let Some(sources) = self.reverse_edges.get_mut(&target) {
                sources.remove(name);
                if sources.is_empty() {
                    self.reverse_edges.remove(&target);
                }
            }
        }
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains(name)
    }

    /// 특정 타입의 의존성 조회 (정렬됨)
    pub fn dependencies(&self, name: &str) -> BTreeSet<String> {
        self.edges
            .get(name)
            .map(|deps| deps.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// 특정 타입을 의존하는 타입들 조회 (정렬됨)
    pub fn dependents(&self, name: &str) -> BTreeSet<String> {
        self.reverse_edges
            .get(name)
            .map(|deps| deps.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// 의존자의 의존자까지 (BFS, 순환 안전, 시작 노드 제외)
    pub fn transitive_dependents(&self, name: &str) -> Vec<String> {
        let mut visited = HashSet::new();
        visited.insert(name.to_string());
        let mut queue = VecDeque::from([name.to_string()]);
        let mut result = Vec::new();

        while let Some(current) = queue.pop_front() {
            for dependent in self.dependents(&current) {
                if visited.insert(dependent.clone()) {
                    result.push(dependent.clone());
                    queue.push_back(dependent);
                }
            }
        }

        result
    }

    /// 나가는 엣지 수
    pub fn out_degree(&self, name: &str) -> usize {
        self.edges.get(name).map(|e| e.len()).unwrap_or(0)
    }

    /// 모든 엣지 대상 (soft invariant 검사용)
    pub fn edge_targets(&self) -> BTreeSet<&str> {
        self.reverse_edges.keys().map(String::as_str).collect()
    }

    /// 노드 수
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// 엣지 수
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(|e| e.len()).sum()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.reverse_edges.clear();
    }

    /// 스냅샷 (의존성이 없는 노드는 빈 집합)
    pub fn snapshot(&self) -> GraphSnapshot {
        self.nodes
            .iter()
            .map(|node| (node.clone(), self.dependencies(node)))
            .collect()
    }
}
