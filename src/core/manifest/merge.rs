// ─── Merge Engine ───
// Layers loader overlays on top of a base manifest. Order matters: the last
// overlay applied owns the entry point and the front of the classpath.

use super::model::LaunchManifest;

/// Layer one overlay on `base`. Neither input is modified.
///
/// - arguments: base then overlay, duplicates kept
/// - libraries: overlay first so a first-wins dedupe favors the loader
/// - `id`, `main_class`: always the overlay's
/// - optional scalars: the overlay's when present
/// - `inherits_from`: the base's; the overlay's parent is `base` itself
/// - processors: base then overlay
pub fn merge(base: &LaunchManifest, overlay: &LaunchManifest) -> LaunchManifest {
    let mut game_arguments = base.game_arguments.clone();
    game_arguments.extend(overlay.game_arguments.iter().cloned());

    let mut jvm_arguments = base.jvm_arguments.clone();
    jvm_arguments.extend(overlay.jvm_arguments.iter().cloned());

    let mut libraries = overlay.libraries.clone();
    libraries.extend(base.libraries.iter().cloned());

    let mut processors = base.processors.clone();
    processors.extend(overlay.processors.iter().cloned());

    LaunchManifest {
        id: overlay.id.clone(),
        inherits_from: base.inherits_from.clone(),
        main_class: overlay.main_class.clone(),
        game_arguments,
        jvm_arguments,
        libraries,
        asset_index: overlay
            .asset_index
            .clone()
            .or_else(|| base.asset_index.clone()),
        java_version: overlay.java_version.or(base.java_version),
        processors,
    }
}

/// Left fold of `overlays` onto `base`, in the order given.
pub fn merge_all<'a, I>(base: LaunchManifest, overlays: I) -> LaunchManifest
where
    I: IntoIterator<Item = &'a LaunchManifest>,
{
    overlays
        .into_iter()
        .fold(base, |acc, overlay| merge(&acc, overlay))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::manifest::model::{Argument, AssetIndexInfo, LibraryDescriptor};

    fn manifest(id: &str, main_class: &str, libs: &[&str], game: &[&str]) -> LaunchManifest {
        LaunchManifest {
            id: id.into(),
            main_class: main_class.into(),
            libraries: libs.iter().map(|l| LibraryDescriptor::new(*l)).collect(),
            game_arguments: game.iter().map(|a| Argument::plain(*a)).collect(),
            ..LaunchManifest::default()
        }
    }

    fn names(m: &LaunchManifest) -> Vec<&str> {
        m.libraries.iter().map(|l| l.name.as_str()).collect()
    }

    #[test]
    fn single_overlay() {
        let mut base = manifest("1.20.1", "net.minecraft.client.main.Main", &["com.mojang:brigadier:1.1.8"], &["--demo"]);
        base.asset_index = Some(AssetIndexInfo {
            id: "5".into(),
            url: "https://example.invalid/5.json".into(),
            sha1: None,
            total_size: None,
        });
        base.java_version = Some(17);
        let overlay = manifest(
            "fabric-loader-0.15.1-1.20.1",
            "net.fabricmc.loader.impl.launch.knot.KnotClient",
            &["net.fabricmc:fabric-loader:0.15.1"],
            &["--demo"],
        );

        let merged = merge(&base, &overlay);
        assert_eq!(merged.main_class, overlay.main_class);
        assert_eq!(merged.id, "fabric-loader-0.15.1-1.20.1");
        assert_eq!(
            names(&merged),
            vec!["net.fabricmc:fabric-loader:0.15.1", "com.mojang:brigadier:1.1.8"]
        );
        // Positional pairs survive, so duplicates are intentional.
        assert_eq!(merged.game_arguments.len(), 2);
        assert_eq!(merged.asset_index, base.asset_index);
        assert_eq!(merged.java_version, Some(17));
    }

    #[test]
    fn folded_parent_is_not_inherited_again() {
        let base = manifest("1.20.1", "net.minecraft.client.main.Main", &["com.mojang:brigadier:1.1.8"], &[]);
        let mut overlay = manifest("1.20.1-forge-47.2.0", "cpw.mods.bootstraplauncher.BootstrapLauncher", &[], &[]);
        overlay.inherits_from = Some("1.20.1".into());

        let merged = merge(&base, &overlay);
        assert_eq!(merged.inherits_from, None);

        let mut child = base.clone();
        child.inherits_from = Some("1.20".into());
        assert_eq!(merge(&child, &overlay).inherits_from.as_deref(), Some("1.20"));
    }

    #[test]
    fn inputs_are_untouched() {
        let base = manifest("b", "B", &["a:b:1"], &["--x"]);
        let overlay = manifest("o", "O", &["c:d:1"], &["--y"]);
        let base_before = base.clone();
        let overlay_before = overlay.clone();
        let _ = merge(&base, &overlay);
        assert_eq!(base, base_before);
        assert_eq!(overlay, overlay_before);
    }

    #[test]
    fn left_fold_prepends_in_reverse_application_order() {
        let base = manifest("b", "B", &["g:base:1"], &["--b"]);
        let o1 = manifest("o1", "O1", &["g:one:1"], &["--o1"]);
        let o2 = manifest("o2", "O2", &["g:two:1"], &["--o2"]);

        let folded = merge_all(base.clone(), [&o1, &o2]);
        assert_eq!(folded, merge(&merge(&base, &o1), &o2));
        assert_eq!(folded.main_class, "O2");
        assert_eq!(names(&folded), vec!["g:two:1", "g:one:1", "g:base:1"]);
        assert_eq!(
            folded.game_arguments,
            vec![Argument::plain("--b"), Argument::plain("--o1"), Argument::plain("--o2")]
        );
    }

    #[test]
    fn merge_is_not_commutative() {
        let base = manifest("b", "B", &[], &[]);
        let o1 = manifest("o1", "O1", &[], &[]);
        let o2 = manifest("o2", "O2", &[], &[]);
        assert_eq!(merge_all(base.clone(), [&o1, &o2]).main_class, "O2");
        assert_eq!(merge_all(base, [&o2, &o1]).main_class, "O1");
    }

    #[test]
    fn no_overlays_returns_base() {
        let base = manifest("1.20.1", "net.minecraft.client.main.Main", &["a:b:1"], &["--x"]);
        let none: [&LaunchManifest; 0] = [];
        assert_eq!(merge_all(base.clone(), none), base);
    }
}
