//! `tallow receive` — accept incoming files in a room

use std::path::PathBuf;

use anyhow::Context;
use tallow_protocol::ids::{PeerId, TransferId};
use tallow_protocol::transfer::metadata::TransferMode;
use tallow_protocol::transfer::receive::ReceivePipeline;
use tallow_protocol::transfer::state_machine::TransferState;
use tallow_protocol::wire::messages::{FileRequestData, FileResponseData};

use crate::cli::ReceiveArgs;
use crate::output::{self, TransferProgressBar};
use crate::session::{JoinOptions, RoomSession};
use crate::transport;

pub async fn execute(args: ReceiveArgs, json: bool) -> anyhow::Result<()> {
    let config = tallow_store::config::load_config().context("loading configuration")?;

    let signaling_url = args.room.signaling_url.clone().unwrap_or_else(|| config.connection.signaling_url.clone());
    let room_code = args.room.room.clone().context("a room code is required: pass --room")?;
    let display_name = args.room.name.clone().unwrap_or_else(|| format!("tallow-cli/{}", env!("CARGO_PKG_VERSION")));
    let output_dir = args.output.clone().unwrap_or_else(|| config.transfer.download_dir.clone());
    std::fs::create_dir_all(&output_dir).with_context(|| format!("creating {}", output_dir.display()))?;

    let mut room = RoomSession::join(JoinOptions {
        signaling_url,
        room_code,
        password: args.room.password.clone(),
        display_name,
    })
    .await
    .context("joining room")?;

    if json {
        println!("{}", serde_json::json!({ "event": "joined", "room": room.room_code.0 }));
    } else {
        output::color::info(&format!("room code: {}", output::color::room_code(&room.room_code.0)));
    }

    let peer = room.wait_for_peer().await.context("waiting for a peer to join")?;
    let session_key = room.key_exchange(&peer).await.context("key exchange")?;

    if args.room.verify {
        if json {
            output::verify::display_verification_json(session_key.as_bytes());
        } else {
            output::verify::display_verification(session_key.as_bytes(), true);
        }
    }

    let auto_accept = args.yes || record_trust_and_check_auto_accept(&room, &peer, &config)?;

    loop {
        let envelope = room.recv_any().await.context("waiting for the next message")?;
        match envelope.kind.as_str() {
            "file-request" => {
                handle_file_request(&mut room, &peer, session_key.as_bytes(), envelope.data, &output_dir, auto_accept, json).await?;
            }
            "peer-left" => {
                output::color::info("peer left the room");
                break;
            }
            _ => continue,
        }
    }

    Ok(())
}

/// Record (or re-confirm) first contact, and say whether config allows
/// skipping the accept prompt for this peer's trust level.
fn record_trust_and_check_auto_accept(
    room: &RoomSession,
    peer: &PeerId,
    config: &tallow_store::config::TallowConfig,
) -> anyhow::Result<bool> {
    let Some(entry) = room.roster_peer(peer) else { return Ok(false) };
    let mut store = crate::trust_store::load().context("loading trust store")?;
    let fp = store.record_contact(&entry.name, entry.device_type, entry.browser_info.as_deref());
    let level = store.level(fp);
    crate::trust_store::save(&store).context("saving trust store")?;
    if level.should_warn() {
        output::color::warning(&format!("first contact with {} ({})", entry.name, fp.hex()));
    }
    Ok(config.transfer.auto_accept_trusted && level.auto_accept())
}

async fn handle_file_request(
    room: &mut RoomSession,
    peer: &PeerId,
    session_key: &[u8; 32],
    data: Option<serde_json::Value>,
    output_dir: &std::path::Path,
    auto_accept: bool,
    json: bool,
) -> anyhow::Result<()> {
    let request: FileRequestData =
        serde_json::from_value(data.context("file-request carried no data")?).context("parsing file-request")?;
    let transfer_id = TransferId::from_uuid_string(&request.file_id)
        .context("file-request carried a malformed transfer id")?;

    let accept = auto_accept
        || output::prompts::confirm(&format!("accept {} ({})?", request.name, output::format_size(request.size)))?;

    room.send_control("file-response", peer, FileResponseData { file_id: request.file_id.clone(), accepted: accept })
        .await
        .context("sending file-response")?;

    if !accept {
        output::color::warning(&format!("{}: declined", request.name));
        return Ok(());
    }

    let mut pipeline = ReceivePipeline::new(transfer_id, output_dir, TransferMode::P2p, None);
    pipeline.accept()?;

    let mut bar = (!json).then(|| TransferProgressBar::new(request.size));
    let mut dest_path: Option<PathBuf> = None;
    let mut received = 0u64;

    loop {
        let frame_envelope = room.recv_control("relay-data").await.context("waiting for transfer data")?;
        let frame = transport::decode_frame(room, peer, session_key, transfer_id, &frame_envelope)?;
        received += frame.payload.len() as u64;

        let finished = pipeline.handle_frame(frame)?;
        if dest_path.is_none() {
            dest_path = pipeline.dest_path().map(|p| p.to_path_buf());
        }
        if let Some(bar) = bar.as_mut() {
            bar.update(received.min(request.size));
        }

        if let Some(bytes) = finished {
            let path = dest_path.context("file-start never arrived")?;
            std::fs::write(&path, &bytes).with_context(|| format!("writing {}", path.display()))?;
            if let Some(bar) = bar.as_mut() {
                bar.finish();
            }
            if json {
                println!(
                    "{}",
                    serde_json::json!({ "event": "received", "file": request.name, "path": path.display().to_string(), "bytes": bytes.len() })
                );
            } else {
                output::color::success(&format!("received {} -> {}", request.name, path.display()));
            }
            debug_assert_eq!(pipeline.state(), TransferState::Done);
            break;
        }
    }

    Ok(())
}
