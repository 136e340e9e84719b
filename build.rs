fn main() {
    // Build metadata (version, branch, commit) for `entrypoints::metadata`.
    shadow_rs::ShadowBuilder::builder()
        .build()
        .expect("failed to generate shadow-rs build info");
}
