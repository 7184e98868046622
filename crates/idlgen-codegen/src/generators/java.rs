//! Java backend
//!
//! Renders one class per client cluster with its cluster, attribute,
//! command and event ids plus the cluster's enums, and a `ClusterIds`
//! index of every client cluster.

use idlgen_core::Idl;
use idlgen_core::idl::{Cluster, ClusterSide};
use minijinja::{Environment, context};

use crate::error::Result;
use crate::generator::{CodeGenerator, render_one_output, template_environment};
use crate::storage::GeneratorStorage;

/// Directory (relative to the output root) that receives the Java package
pub const PACKAGE_DIR: &str = "java/chip/devicecontroller/cluster";

const TEMPLATES: &[(&str, &str)] = &[
    (
        "ClusterClass.java.jinja",
        include_str!("../../templates/java/ClusterClass.java.jinja"),
    ),
    (
        "ClusterIds.java.jinja",
        include_str!("../../templates/java/ClusterIds.java.jinja"),
    ),
];

/// Generator for Java cluster definitions
pub struct JavaGenerator<'a> {
    storage: &'a mut dyn GeneratorStorage,
    idl: &'a Idl,
}

impl<'a> JavaGenerator<'a> {
    /// Create a generator over `idl` writing into `storage`
    pub fn new(storage: &'a mut dyn GeneratorStorage, idl: &'a Idl) -> Self {
        Self { storage, idl }
    }

    /// Output path for a cluster's class
    pub fn cluster_file(cluster: &Cluster) -> String {
        format!("{PACKAGE_DIR}/{}Cluster.java", cluster.name)
    }

    fn render_cluster(
        &mut self,
        env: &Environment<'_>,
        cluster: &Cluster,
        dry_run: bool,
    ) -> Result<()> {
        render_one_output(
            env,
            &mut *self.storage,
            "ClusterClass.java.jinja",
            &Self::cluster_file(cluster),
            context! { cluster => cluster },
            dry_run,
        )?;
        Ok(())
    }
}

impl CodeGenerator for JavaGenerator<'_> {
    fn name(&self) -> &'static str {
        "java"
    }

    fn emit(&mut self, dry_run: bool) -> Result<()> {
        let env = template_environment(TEMPLATES)?;
        let idl = self.idl;

        let clusters: Vec<&Cluster> = idl.clusters_on(ClusterSide::Client).collect();
        tracing::debug!(clusters = clusters.len(), "Rendering client clusters");

        for cluster in &clusters {
            self.render_cluster(&env, cluster, dry_run)?;
        }

        render_one_output(
            &env,
            &mut *self.storage,
            "ClusterIds.java.jinja",
            &format!("{PACKAGE_DIR}/ClusterIds.java"),
            context! { clusters => clusters },
            dry_run,
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DryRunStorage;
    use idlgen_core::Parser;
    use tempfile::TempDir;

    const ON_OFF: &str = r#"
client cluster OnOff = 6 {
  enum OnOffDelayedAllOffEffectVariant : ENUM8 {
    kFadeToOffIn0p8Seconds = 0;
    kNoFade = 1;
  }

  readonly attribute boolean onOff = 0;
  attribute nullable int16u onTime = 16385;

  command Off(): DefaultSuccess = 0;
  timed command Toggle(): DefaultSuccess = 2;
}

server cluster Basic = 40 {
  readonly attribute int16u productID = 4;
}
"#;

    fn render(text: &str) -> Vec<(String, String)> {
        let idl = Parser::new().parse(text).unwrap();
        let dir = TempDir::new().unwrap();
        let mut storage = DryRunStorage::new(dir.path(), false).unwrap();

        JavaGenerator::new(&mut storage, &idl).emit(true).unwrap();

        storage
            .intents()
            .map(|i| (i.relative_path.display().to_string(), i.content.clone()))
            .collect()
    }

    #[test]
    fn test_emits_client_clusters_and_index() {
        let files = render(ON_OFF);
        let paths: Vec<&str> = files.iter().map(|(p, _)| p.as_str()).collect();

        assert_eq!(
            paths,
            vec![
                "java/chip/devicecontroller/cluster/OnOffCluster.java",
                "java/chip/devicecontroller/cluster/ClusterIds.java",
            ]
        );
    }

    #[test]
    fn test_cluster_class_content() {
        let files = render(ON_OFF);
        let class = &files[0].1;

        assert!(class.contains("package chip.devicecontroller.cluster;"));
        assert!(class.contains("public final class OnOffCluster {"));
        assert!(class.contains("CLUSTER_ID = 0x00000006L;"));
        assert!(class.contains("public static final long ON_OFF = 0x00000000L;"));
        assert!(class.contains("public static final long ON_TIME = 0x00004001L;"));
        assert!(class.contains("public static final long TOGGLE = 0x00000002L;"));
        assert!(class.contains("timed"));
        assert!(class.contains("public enum OnOffDelayedAllOffEffectVariant {"));
        assert!(class.contains("K_FADE_TO_OFF_IN0P8_SECONDS(0),"));
        assert!(class.contains("K_NO_FADE(1);"));
        assert!(!class.contains("class Event"));
        assert!(class.ends_with("}\n"));
    }

    #[test]
    fn test_server_clusters_are_skipped() {
        let files = render(ON_OFF);
        assert!(!files.iter().any(|(_, c)| c.contains("BasicCluster")));
        assert!(!files[1].1.contains("BASIC"));
        assert!(files[1].1.contains("public static final long ON_OFF = 0x00000006L;"));
    }

    #[test]
    fn test_empty_enum_keeps_body_separator() {
        let files = render("client cluster Empty = 1 { enum Nothing : ENUM8 { } }");
        let class = &files[0].1;

        assert!(class.contains("public enum Nothing {\n    ;\n\n    public final int value;"));
    }

    #[test]
    fn test_no_client_clusters_emits_only_index() {
        let files = render("server cluster Basic = 40 { }");
        assert_eq!(files.len(), 1);
        assert!(files[0].0.ends_with("ClusterIds.java"));
    }

    #[test]
    fn test_output_independent_of_dry_run_flag() {
        let idl = Parser::new().parse(ON_OFF).unwrap();
        let dir = TempDir::new().unwrap();

        let mut first = DryRunStorage::new(dir.path(), false).unwrap();
        JavaGenerator::new(&mut first, &idl).emit(true).unwrap();
        let mut second = DryRunStorage::new(dir.path(), false).unwrap();
        JavaGenerator::new(&mut second, &idl).emit(false).unwrap();

        assert_eq!(
            first.intents().collect::<Vec<_>>(),
            second.intents().collect::<Vec<_>>()
        );
    }
}
