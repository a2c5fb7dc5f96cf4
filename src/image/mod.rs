// Image references: classify the `image` field of a notification payload.
//
// A payload image is either a plain HTTP URL, an IPFS-addressed resource,
// or an inline base64 data URI. Plain URLs whose file name is an IPFS hash
// (e.g. `.../QmHash.jpg`) are rewritten to go through a public gateway.

pub mod reference;
