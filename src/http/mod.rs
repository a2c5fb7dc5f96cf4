// JSON over HTTP: a single-shot request helper.
//
// The helper never touches the network directly: it talks to a Transport,
// so tests (and embedders with their own stack) can swap in something else.
// ReqwestTransport is the production implementation.

pub mod client;
pub mod transport;
