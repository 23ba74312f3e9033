fn main() {
    let service = tonic_build::manual::Service::builder()
        .name("SequenceEnv")
        .package("sequence_env")
        .method(method("reset", "Reset", "ResetRequest", "ResetResponse"))
        .method(method("step", "Step", "StepRequest", "StepResponse"))
        .method(method(
            "action_mask",
            "ActionMask",
            "ActionMaskRequest",
            "ActionMaskResponse",
        ))
        .method(method("get_spec", "GetSpec", "GetSpecRequest", "GetSpecResponse"))
        .build();

    tonic_build::manual::Builder::new().compile(&[service]);
}

fn method(name: &str, route: &str, input: &str, output: &str) -> tonic_build::manual::Method {
    tonic_build::manual::Method::builder()
        .name(name)
        .route_name(route)
        .input_type(format!("crate::proto::{input}"))
        .output_type(format!("crate::proto::{output}"))
        .codec_path("tonic::codec::ProstCodec")
        .build()
}
