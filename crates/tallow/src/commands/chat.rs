//! `tallow chat` — free-text messaging inside a room, for eyeballing RS+PCM+TE

use anyhow::Context;
use tallow_protocol::ids::PeerId;
use tallow_protocol::transfer::metadata::TransferMode;
use tallow_protocol::transfer::receive::decode_text_frame;
use tallow_protocol::wire::codec::{DataFrame, FrameKind};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::ChatArgs;
use crate::harness::ChatLog;
use crate::output;
use crate::session::{JoinOptions, RoomSession};
use crate::transport;

pub async fn execute(args: ChatArgs, json: bool) -> anyhow::Result<()> {
    let config = tallow_store::config::load_config().context("loading configuration")?;

    let signaling_url = args.room.signaling_url.clone().unwrap_or_else(|| config.connection.signaling_url.clone());
    let room_code = args.room.room.clone().unwrap_or_else(|| tallow_protocol::room::generate(8).0);
    let display_name = args.room.name.clone().unwrap_or_else(|| format!("tallow-cli/{}", env!("CARGO_PKG_VERSION")));

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

    if !json {
        output::color::info("connected — type a line and press enter to send, ctrl-d to quit");
    }

    let outbound_id = transport::chat_transfer_id(&room.room_code, &room.self_id, &peer);
    let inbound_id = transport::chat_transfer_id(&room.room_code, &peer, &room.self_id);

    let mut log = ChatLog::new();
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut next_seq = 0u32;

    loop {
        tokio::select! {
            line = stdin.next_line() => {
                let Some(text) = line.context("reading stdin")? else { break };
                if text.is_empty() {
                    continue;
                }
                let frame = DataFrame::new(FrameKind::Text, outbound_id, next_seq, text.clone().into_bytes());
                next_seq += 1;
                transport::send_frame(&mut room, &peer, session_key.as_bytes(), frame).await.context("sending chat message")?;
                log.push(room.self_id.clone(), text);
            }
            envelope = room.recv_any() => {
                let envelope = envelope.context("waiting for the next message")?;
                match envelope.kind.as_str() {
                    "relay-data" => {
                        let frame = transport::decode_frame(&mut room, &peer, session_key.as_bytes(), inbound_id, &envelope)?;
                        if frame.kind != FrameKind::Text {
                            continue;
                        }
                        let text = decode_text_frame(&frame, TransferMode::P2p, None).context("decoding chat message")?;
                        print_incoming(&peer, &text, json);
                        log.push(peer.clone(), text);
                    }
                    "peer-left" => {
                        output::color::info("peer left the room");
                        break;
                    }
                    _ => continue,
                }
            }
        }
    }

    if !json {
        output::color::info(&format!("{} message(s) exchanged", log.len()));
    }
    Ok(())
}

fn print_incoming(peer: &PeerId, text: &str, json: bool) {
    if json {
        println!("{}", serde_json::json!({ "event": "message", "from": peer.as_str(), "text": text }));
    } else {
        println!("{}: {}", output::color::styled(peer.as_str(), output::color::Style::Info), text);
    }
}
