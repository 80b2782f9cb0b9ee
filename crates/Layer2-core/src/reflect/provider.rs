//! Type Provider - 런타임 리플렉션을 대체하는 타입 열거 인터페이스
//!
//! 레지스트리는 타입을 직접 찾지 않고 등록된 `TypeProvider` 들에게 스캔 범위를
//! 넘겨 후보 디스크립터를 열거합니다.

use super::descriptor::TypeDescriptor;
use super::scope::ScanScope;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use trellis_foundation::{Error, Result};

/// 타입 열거 결과 (지연 이터레이터)
pub type TypeIter<'a> = Box<dyn Iterator<Item = TypeDescriptor> + Send + 'a>;

/// 타입 열거 프로바이더
pub trait TypeProvider: Send + Sync {
    /// 프로바이더 이름 (로그용)
    fn name(&self) -> &str;

    /// 스캔 범위에 포함되는 타입 열거
    fn enumerate<'a>(&'a self, scope: &'a ScanScope) -> TypeIter<'a>;
}

// ============================================================================
// StaticTypeProvider
// ============================================================================

/// 메모리 기반 프로바이더
///
/// 빌드 단계나 테스트가 hot reload 전에 변경된 타입을 게시할 수 있도록
/// `upsert` / `remove` 를 지원합니다.
pub struct StaticTypeProvider {
    name: String,
    types: RwLock<Vec<TypeDescriptor>>,
}

impl StaticTypeProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: RwLock::new(Vec::new()),
        }
    }

    /// 초기 타입 목록과 함께 생성
    pub fn with_types(name: impl Into<String>, types: Vec<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            types: RwLock::new(types),
        }
    }

    /// 같은 qualified name 이 있으면 교체, 없으면 추가 (순서 유지)
    pub fn upsert(&self, descriptor: TypeDescriptor) {
        let mut types = self.types.write();
        match types
            .iter_mut()
            .find(|t| t.qualified_name() == descriptor.qualified_name())
        {
            Some(existing) => *existing = descriptor,
            None => types.push(descriptor),
        }
    }

    /// qualified name 으로 제거
    pub fn remove(&self, qualified_name: &str) -> bool {
        let mut types = self.types.write();
        let before = types.len();
        types.retain(|t| t.qualified_name() != qualified_name);
        types.len() != before
    }

    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }
}

impl TypeProvider for StaticTypeProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn enumerate<'a>(&'a self, scope: &'a ScanScope) -> TypeIter<'a> {
        // 열거 중 upsert 가 막히지 않도록 스냅샷
        let snapshot = self.types.read().clone();
        Box::new(
            snapshot
                .into_iter()
                .filter(move |t| scope.matches(t.qualified_name())),
        )
    }
}

// ============================================================================
// ManifestTypeProvider
// ============================================================================

/// JSON 매니페스트 기반 프로바이더
///
/// 빌드 타임 코드 생성 단계가 쓴 디스크립터 배열을 읽습니다.
pub struct ManifestTypeProvider {
    path: PathBuf,
    types: RwLock<Arc<Vec<TypeDescriptor>>>,
}

impl ManifestTypeProvider {
    /// 매니페스트 파일 로드
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let types = Self::read_manifest(&path)?;
        info!(
            "[manifest] Loaded {} types from {}",
            types.len(),
            path.display()
        );
        Ok(Self {
            path,
            types: RwLock::new(Arc::new(types)),
        })
    }

    /// 파일 다시 읽기 (실패 시 기존 목록 유지)
    pub fn reload(&self) -> Result<usize> {
        let types = Self::read_manifest(&self.path)?;
        let count = types.len();
        *self.types.write() = Arc::new(types);
        debug!("[manifest] Reloaded {} ({} types)", self.path.display(), count);
        Ok(count)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_manifest(path: &Path) -> Result<Vec<TypeDescriptor>> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read manifest {}: {}", path.display(), e))
        })?;
        let types: Vec<TypeDescriptor> = serde_json::from_str(&content)?;
        Ok(types.into_iter().map(TypeDescriptor::normalized).collect())
    }
}

impl TypeProvider for ManifestTypeProvider {
    fn name(&self) -> &str {
        "manifest"
    }

    fn enumerate<'a>(&'a self, scope: &'a ScanScope) -> TypeIter<'a> {
        let types = self.types.read().clone();
        let len = types.len();
        Box::new(
            (0..len)
                .map(move |i| types[i].clone())
                .filter(move |t| scope.matches(t.qualified_name())),
        )
    }
}

// ============================================================================
// BuiltinTypeProvider
// ============================================================================

/// 런타임 기본 타입 (루트 레지스트리용)
const RUNTIME_TYPES: &[&str] = &[
    "String", "str", "bool", "char", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16",
    "u32", "u64", "u128", "usize", "f32", "f64", "Vec", "VecDeque", "HashMap", "HashSet",
    "BTreeMap", "BTreeSet", "Option", "Result", "Box", "Arc", "Rc", "Duration",
];

/// 런타임 네임스페이스 아래의 기본 타입 프로바이더
pub struct BuiltinTypeProvider {
    namespace: String,
}

impl BuiltinTypeProvider {
    /// `namespace` 는 `core.` 처럼 점으로 끝나는 prefix
    pub fn new(namespace: impl Into<String>) -> Self {
        let mut namespace = namespace.into();
        if !namespace.is_empty() && !namespace.ends_with('.') {
            namespace.push('.');
        }
        Self { namespace }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

impl Default for BuiltinTypeProvider {
    fn default() -> Self {
        Self::new("core.")
    }
}

impl TypeProvider for BuiltinTypeProvider {
    fn name(&self) -> &str {
        "builtin"
    }

    fn enumerate<'a>(&'a self, scope: &'a ScanScope) -> TypeIter<'a> {
        Box::new(
            RUNTIME_TYPES
                .iter()
                .map(move |name| {
                    TypeDescriptor::new(format!("{}{}", self.namespace, name)).annotated("builtin")
                })
                .filter(move |t| scope.matches(t.qualified_name())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_static_provider_scope() {
        let provider = StaticTypeProvider::with_types(
            "app",
            vec![
                TypeDescriptor::new("app.services.OrderService"),
                TypeDescriptor::new("app.repo.OrderRepository"),
            ],
        );
        let scope = ScanScope::new(["app.services"]);
        let names: Vec<_> = provider
            .enumerate(&scope)
            .map(|t| t.simple_name().to_string())
            .collect();
        assert_eq!(names, vec!["OrderService"]);
    }

    #[test]
    fn test_static_provider_upsert_and_remove() {
        let provider = StaticTypeProvider::new("app");
        provider.upsert(TypeDescriptor::new("app.A"));
        provider.upsert(TypeDescriptor::new("app.B"));
        provider.upsert(TypeDescriptor::new("app.A").with_field("b", "B"));

        assert_eq!(provider.len(), 2);
        let first = provider.enumerate(&ScanScope::unrestricted()).next().unwrap();
        assert_eq!(first.members().len(), 1);

        assert!(provider.remove("app.A"));
        assert!(!provider.remove("app.A"));
        assert_eq!(provider.len(), 1);
    }

    #[test]
    fn test_manifest_load_and_reload() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"qualifiedName": "app.A"}}]"#).unwrap();
        file.flush().unwrap();

        let provider = ManifestTypeProvider::load(file.path()).unwrap();
        assert_eq!(provider.enumerate(&ScanScope::unrestricted()).count(), 1);

        std::fs::write(
            file.path(),
            r#"[{"qualifiedName": "app.A"}, {"qualifiedName": "app.B", "simpleName": "Bee"}]"#,
        )
        .unwrap();
        assert_eq!(provider.reload().unwrap(), 2);

        let names: Vec<_> = provider
            .enumerate(&ScanScope::unrestricted())
            .map(|t| t.simple_name().to_string())
            .collect();
        assert_eq!(names, vec!["A", "Bee"]);
    }

    #[test]
    fn test_manifest_broken_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        file.flush().unwrap();
        assert!(ManifestTypeProvider::load(file.path()).is_err());
    }

    #[test]
    fn test_builtin_namespace() {
        let provider = BuiltinTypeProvider::new("core");
        assert_eq!(provider.namespace(), "core.");

        let string = provider
            .enumerate(&ScanScope::unrestricted())
            .find(|t| t.simple_name() == "String")
            .unwrap();
        assert_eq!(string.qualified_name(), "core.String");
        assert!(string.has_annotation("builtin"));
    }
}
