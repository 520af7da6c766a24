//! `tallow send` — push one or more files into a room

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use tallow_protocol::ids::{PeerId, TransferId};
use tallow_protocol::transfer::metadata::TransferMode;
use tallow_protocol::transfer::send::SendPipeline;
use tallow_protocol::wire::messages::{FileRequestData, FileResponseData, TransferModeWire};
use tallow_store::trust::TrustLevel;

use crate::cli::SendArgs;
use crate::output::{self, TransferProgressBar};
use crate::session::{JoinOptions, RoomSession};
use crate::transport;

pub async fn execute(args: SendArgs, json: bool) -> anyhow::Result<()> {
    let config = tallow_store::config::load_config().context("loading configuration")?;

    let signaling_url = args.room.signaling_url.clone().unwrap_or_else(|| config.connection.signaling_url.clone());
    let room_code = args.room.room.clone().unwrap_or_else(|| tallow_protocol::room::generate(8).0);
    let display_name = args.room.name.clone().unwrap_or_else(default_display_name);

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

    let peer = match &args.to {
        Some(id) => PeerId::from(id.as_str()),
        None => room.wait_for_peer().await.context("waiting for a peer to join")?,
    };

    let session_key = room.key_exchange(&peer).await.context("key exchange")?;

    if args.room.verify {
        if json {
            output::verify::display_verification_json(session_key.as_bytes());
        } else {
            output::verify::display_verification(session_key.as_bytes(), true);
        }
    }

    record_trust(&room, &peer)?;

    for path in &args.files {
        send_one_file(&mut room, &peer, session_key.as_bytes(), path, json).await?;
    }

    Ok(())
}

fn default_display_name() -> String {
    format!("tallow-cli/{}", env!("CARGO_PKG_VERSION"))
}

/// Record (or re-confirm) first contact so the peer shows up in `tallow
/// trust list`. Roster details are only known for peers present when we
/// joined — a peer that joins later via `peer-joined` has no name/device
/// fields to fingerprint, so there's nothing to record for it.
fn record_trust(room: &RoomSession, peer: &PeerId) -> anyhow::Result<()> {
    let Some(entry) = room.roster_peer(peer) else { return Ok(()) };
    let mut store = crate::trust_store::load().context("loading trust store")?;
    let fp = store.record_contact(&entry.name, entry.device_type, entry.browser_info.as_deref());
    let level = store.level(fp);
    crate::trust_store::save(&store).context("saving trust store")?;
    if level == TrustLevel::Seen {
        output::color::warning(&format!("first contact with {} ({})", entry.name, fp.hex()));
    }
    Ok(())
}

async fn send_one_file(
    room: &mut RoomSession,
    peer: &PeerId,
    session_key: &[u8; 32],
    path: &PathBuf,
    json: bool,
) -> anyhow::Result<()> {
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| "file".to_string());
    let transfer_id = TransferId::generate();

    let mut pipeline = SendPipeline::new(transfer_id, data, TransferMode::P2p, None);
    let meta = pipeline.metadata(name.clone());

    room.send_control(
        "file-request",
        peer,
        FileRequestData {
            file_id: transfer_id.to_uuid_string(),
            name: name.clone(),
            size: meta.size,
            total_chunks: meta.total_chunks,
            transfer_mode: TransferModeWire::Relay,
        },
    )
    .await
    .context("sending file-request")?;

    let response_envelope = room.recv_control("file-response").await.context("waiting for file-response")?;
    let response: FileResponseData = response_envelope
        .data
        .context("file-response carried no data")
        .and_then(|v| serde_json::from_value(v).context("parsing file-response"))?;

    if response.file_id != transfer_id.to_uuid_string() {
        bail!("file-response referred to an unexpected transfer id");
    }
    if !response.accepted {
        pipeline.decline()?;
        output::color::warning(&format!("{name}: declined by peer"));
        return Ok(());
    }
    pipeline.accept()?;

    let mut bar = (!json).then(|| TransferProgressBar::new(meta.size));
    let start_frame = pipeline.start_streaming(name.clone())?;
    transport::send_frame(room, peer, session_key, start_frame).await?;

    let mut paused = false;
    let mut sent = 0u64;
    while let Some(frame) = pipeline.next_chunk()? {
        let len = frame.payload.len();
        transport::send_frame(room, peer, session_key, frame).await?;
        pipeline.mark_flushed(len);
        sent += len as u64;
        if let Some(bar) = bar.as_mut() {
            bar.update(sent);
        }
        paused = pipeline.should_pause(paused);
        if paused {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    let end_frame = pipeline.finish()?;
    transport::send_frame(room, peer, session_key, end_frame).await?;

    if let Some(bar) = bar.as_mut() {
        bar.finish();
    }
    if json {
        println!("{}", serde_json::json!({ "event": "sent", "file": name, "bytes": meta.size }));
    } else {
        output::color::success(&format!("sent {name} ({})", output::format_size(meta.size)));
    }
    Ok(())
}
